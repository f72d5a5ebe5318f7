//! Common utilities for CLI commands

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::LinkConfig;
use crate::core::PbxError;
use crate::document::{Document, DocumentRegistry, pbxproj_location};

/// Output format for query commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripts
    Json,
}

/// Shared state for one CLI invocation: the loaded configuration and the
/// registry every project is opened through.
pub struct CommandContext {
    /// Settings for groups and source trees.
    pub config: LinkConfig,
    registry: DocumentRegistry,
}

impl CommandContext {
    /// Creates a context reading projects from the file system.
    ///
    /// # Errors
    /// Returns an error if the configuration file exists but is invalid
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = LinkConfig::load_with_optional(config_path).context("Failed to load pbxlink configuration")?;
        Ok(Self::with_registry(config, DocumentRegistry::with_filesystem()))
    }

    /// Creates a context over an existing registry.
    #[must_use]
    pub const fn with_registry(config: LinkConfig, registry: DocumentRegistry) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Opens the project at `path`, a `.xcodeproj` directory or its
    /// `project.pbxproj`, and selects `target` when given.
    ///
    /// # Errors
    /// Returns an error if the project file does not exist
    pub fn open(&mut self, path: &Path, target: Option<&str>) -> Result<Rc<RefCell<Document>>> {
        let location = pbxproj_location(path);
        let document = self
            .registry
            .get(&location)
            .with_context(|| format!("Failed to open project {}", path.display()))?;

        {
            let mut doc = document.borrow_mut();
            if !doc.is_loaded() {
                return Err(PbxError::BackingStoreUnavailable {
                    path: location.display().to_string(),
                }
                .into());
            }
            if let Some(target) = target {
                doc.set_active_target(target);
            }
        }

        Ok(document)
    }
}
