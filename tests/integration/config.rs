//! Configuration discovery.

use anyhow::Result;
use assert_cmd::Command;
use pbxlink_cli::config::{CONFIG_PATH_ENV, LinkConfig};
use serial_test::serial;

use super::Workspace;

const LIBRARIES_CONFIG: &str = r#"
frameworks_group = "Libraries"
source_tree = "\"<group>\""
"#;

fn workspace_with_libraries_group() -> Result<Workspace> {
    let ws = Workspace::new()?;
    let pbxproj = ws.app.join("project.pbxproj");
    let text = std::fs::read_to_string(&pbxproj)?
        .replace("/* Frameworks */ = {\n\t\t\tisa = PBXGroup;", "/* Libraries */ = {\n\t\t\tisa = PBXGroup;");
    std::fs::write(&pbxproj, text)?;
    std::fs::write(ws.root().join("pbxlink.toml"), LIBRARIES_CONFIG)?;
    Ok(ws)
}

#[test]
fn test_config_flag_selects_groups() -> Result<()> {
    let ws = workspace_with_libraries_group()?;

    Command::cargo_bin("pbxlink")?
        .current_dir(ws.root())
        .args(["--config", "pbxlink.toml", "link", "App/App.xcodeproj", "-t", "App", "Lib/Lib.xcodeproj", "-d", "Lib"])
        .assert()
        .success();

    let text = ws.app_text()?;
    assert!(text.contains("path = \"../Lib/Lib.xcodeproj\"; sourceTree = \"<group>\"; };"));
    Ok(())
}

#[test]
fn test_default_groups_fail_without_frameworks_group() -> Result<()> {
    let ws = workspace_with_libraries_group()?;
    let before = ws.app_text()?;

    Command::cargo_bin("pbxlink")?
        .current_dir(ws.root())
        .env(CONFIG_PATH_ENV, ws.root().join("absent.toml"))
        .args(["link", "App/App.xcodeproj", "-t", "App", "Lib/Lib.xcodeproj", "-d", "Lib"])
        .assert()
        .failure();

    assert_eq!(ws.app_text()?, before);
    Ok(())
}

#[test]
#[serial]
fn test_env_var_points_at_config() -> Result<()> {
    let ws = workspace_with_libraries_group()?;
    let path = ws.root().join("pbxlink.toml");

    // SAFETY: serialized with every other test touching the variable
    unsafe { std::env::set_var(CONFIG_PATH_ENV, &path) };
    let loaded = LinkConfig::load_with_optional(None);
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    let config = loaded?;
    assert_eq!(config.frameworks_group, "Libraries");
    assert_eq!(config.source_tree, "\"<group>\"");
    assert_eq!(config.resources_group, "Resources");
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let ws = Workspace::new()?;
    std::fs::write(ws.root().join("bad.toml"), "frameworks_grop = 1\n")?;

    Command::cargo_bin("pbxlink")?
        .current_dir(ws.root())
        .args(["--config", "bad.toml", "targets", "App/App.xcodeproj"])
        .assert()
        .failure()
        .code(1);
    Ok(())
}
