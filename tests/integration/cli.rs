//! The `pbxlink` binary.

use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

use super::Workspace;
use pbxlink_cli::config::CONFIG_PATH_ENV;

fn pbxlink(ws: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("pbxlink").expect("binary");
    cmd.current_dir(ws.root())
        .env(CONFIG_PATH_ENV, ws.root().join("missing-config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_targets_text() -> Result<()> {
    let ws = Workspace::new()?;
    pbxlink(&ws)
        .args(["targets", "App/App.xcodeproj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("App").and(predicate::str::contains("1D6058900D05DD3D006BFB54")));
    Ok(())
}

#[test]
fn test_targets_json() -> Result<()> {
    let ws = Workspace::new()?;
    let output = pbxlink(&ws)
        .args(["targets", "Lib/Lib.xcodeproj/project.pbxproj", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value["project"], "Lib");
    assert_eq!(value["targets"][0]["name"], "Lib");
    assert_eq!(value["targets"][0]["id"], "D2AAC07D0554694100DB518D");
    Ok(())
}

#[test]
fn test_link_then_deps() -> Result<()> {
    let ws = Workspace::new()?;

    pbxlink(&ws)
        .args(["link", "App/App.xcodeproj", "-t", "App", "Lib/Lib.xcodeproj", "-d", "Lib"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked libLib.a"))
        .stderr(predicate::str::contains("Step 9"));

    pbxlink(&ws)
        .args(["deps", "App/App.xcodeproj", "--target", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("../Lib/Lib.xcodeproj:D2AAC07D0554694100DB518D"));
    Ok(())
}

#[test]
fn test_quiet_hides_steps() -> Result<()> {
    let ws = Workspace::new()?;
    pbxlink(&ws)
        .args(["-q", "link", "App/App.xcodeproj", "-t", "App", "Lib/Lib.xcodeproj", "-d", "Lib"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Step").not());
    Ok(())
}

#[test]
fn test_missing_project_reports_error() -> Result<()> {
    let ws = Workspace::new()?;
    pbxlink(&ws)
        .args(["targets", "Nope/Nope.xcodeproj"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"));
    Ok(())
}

#[test]
fn test_setting_and_framework() -> Result<()> {
    let ws = Workspace::new()?;

    pbxlink(&ws)
        .args(["setting", "App/App.xcodeproj", "OTHER_LDFLAGS", "-lz", "--target", "App"])
        .assert()
        .success();
    pbxlink(&ws)
        .args(["framework", "App/App.xcodeproj", "--target", "App", "QuartzCore.framework"])
        .assert()
        .success();

    let text = ws.app_text()?;
    assert!(text.contains("OTHER_LDFLAGS = -lz;"));
    assert!(text.contains("\t\t\t\t\t-lz,\n\t\t\t\t\t\"-ObjC\","));
    assert!(text.contains("/* QuartzCore.framework in Frameworks */,"));
    Ok(())
}

#[test]
fn test_sources_lists_absolute_paths() -> Result<()> {
    let ws = Workspace::new()?;
    let expected = Path::new("Lib").join("Source").join("Lib.m");

    pbxlink(&ws)
        .args(["sources", "Lib/Lib.xcodeproj"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));

    pbxlink(&ws)
        .args(["sources", "Lib/Lib.xcodeproj", "--headers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lib.h"));
    Ok(())
}
