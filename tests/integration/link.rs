//! Linking projects stored on disk.

use std::fs;

use anyhow::Result;
use pbxlink_cli::config::LinkConfig;
use pbxlink_cli::core::PbxError;
use pbxlink_cli::document::{DocumentRegistry, pbxproj_location};
use pbxlink_cli::linker::link_dependency;
use pbxlink_cli::test_utils::ProjectFixture;

use super::Workspace;

fn link(ws: &Workspace, config: &LinkConfig) -> Result<pbxlink_cli::linker::LinkOutcome, PbxError> {
    let mut registry = DocumentRegistry::with_filesystem();
    let app = registry.get(pbxproj_location(&ws.app))?;
    let lib = registry.get(pbxproj_location(&ws.lib))?;
    app.borrow_mut().set_active_target("App");
    lib.borrow_mut().set_active_target("Lib");
    link_dependency(&app, &lib, config)
}

#[test]
fn test_link_writes_project_file() -> Result<()> {
    let ws = Workspace::new()?;
    let before = ws.app_text()?;

    let outcome = link(&ws, &LinkConfig::default())?;
    let after = ws.app_text()?;

    assert_ne!(before, after);
    assert_eq!(outcome.relative_path, "../Lib/Lib.xcodeproj");
    assert!(after.contains("/* Begin PBXTargetDependency section */"));
    assert!(after.contains("/* Begin PBXContainerItemProxy section */"));
    assert!(after.contains(&format!("{} /* libLib.a in Frameworks */,", outcome.product_build_file)));

    // Linking only inserts: the original lines survive in order
    let mut original = before.lines().peekable();
    for line in after.lines() {
        if original.peek() == Some(&line) {
            original.next();
        }
    }
    assert_eq!(original.next(), None);
    Ok(())
}

#[test]
fn test_relinking_fresh_registry_is_noop() -> Result<()> {
    let ws = Workspace::new()?;
    let config = LinkConfig::default();

    link(&ws, &config)?;
    let once = ws.app_text()?;
    link(&ws, &config)?;

    assert_eq!(ws.app_text()?, once);
    Ok(())
}

#[test]
fn test_dependency_paths_after_link() -> Result<()> {
    let ws = Workspace::new()?;
    link(&ws, &LinkConfig::default())?;

    let mut registry = DocumentRegistry::with_filesystem();
    let app = registry.get(pbxproj_location(&ws.app))?;
    let mut app = app.borrow_mut();

    assert_eq!(app.dependency_names_for_target("App")?, vec!["Lib".to_string()]);
    assert_eq!(
        app.dependency_paths_for_target("App")?,
        vec!["../Lib/Lib.xcodeproj:D2AAC07D0554694100DB518D".to_string()]
    );
    Ok(())
}

#[test]
fn test_missing_frameworks_phase_leaves_file_alone() -> Result<()> {
    let ws = Workspace::with(ProjectFixture::app_without_frameworks_phase())?;
    let before = ws.app_text()?;

    let result = link(&ws, &LinkConfig::default());
    assert!(matches!(result, Err(PbxError::NotFound { .. })));
    assert_eq!(ws.app_text()?, before);
    Ok(())
}

#[test]
fn test_missing_dependency_project() -> Result<()> {
    let ws = Workspace::new()?;
    fs::remove_dir_all(ws.root().join("Lib"))?;

    let result = link(&ws, &LinkConfig::default());
    assert!(matches!(result, Err(PbxError::BackingStoreUnavailable { .. })));
    Ok(())
}
