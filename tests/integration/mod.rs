//! Integration test suite for pbxlink
//!
//! End-to-end tests over real project files in temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: the `pbxlink` binary, run with `assert_cmd`
//! - **config**: configuration file discovery and its effect on linking
//! - **link**: the library linking projects on disk

mod cli;
mod config;
mod link;

use std::path::{Path, PathBuf};

use anyhow::Result;
use pbxlink_cli::test_utils::ProjectFixture;
use tempfile::TempDir;

/// A temporary workspace holding the `App` and `Lib` fixture projects.
pub struct Workspace {
    pub temp: TempDir,
    pub app: PathBuf,
    pub lib: PathBuf,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        Self::with(ProjectFixture::app())
    }

    pub fn with(app: ProjectFixture) -> Result<Self> {
        let temp = TempDir::new()?;
        let app = app.write_to(temp.path())?;
        let lib = ProjectFixture::lib().write_to(temp.path())?;
        Ok(Self { temp, app, lib })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn app_text(&self) -> Result<String> {
        Ok(std::fs::read_to_string(self.app.join("project.pbxproj"))?)
    }
}
