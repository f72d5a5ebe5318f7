//! Configuration for pbxlink.
//!
//! Users can rename the groups and the source tree that pbxlink writes into
//! with a small TOML file. Every key is optional, and a missing file means all
//! defaults are used.
//!
//! # Location
//!
//! 1. `--config <PATH>` on the command line
//! 2. The `PBXLINK_CONFIG_PATH` environment variable
//! 3. `~/.pbxlink/config.toml`
//!
//! # File Format
//!
//! ```toml
//! frameworks_group = "Frameworks"
//! resources_group = "Resources"
//! resources_fallback_group = "Supporting Files"
//! source_tree = "SOURCE_ROOT"
//! xcode_version = "4.2"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbxlink_cli::config::LinkConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = LinkConfig::load_with_optional(None)?;
//! println!("Linking into the {} group", config.frameworks_group);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_FRAMEWORKS_GROUP, DEFAULT_RESOURCES_FALLBACK_GROUP, DEFAULT_RESOURCES_GROUP,
    DEFAULT_SOURCE_TREE,
};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "PBXLINK_CONFIG_PATH";

fn default_frameworks_group() -> String {
    DEFAULT_FRAMEWORKS_GROUP.to_string()
}

fn default_resources_group() -> String {
    DEFAULT_RESOURCES_GROUP.to_string()
}

fn default_resources_fallback_group() -> String {
    DEFAULT_RESOURCES_FALLBACK_GROUP.to_string()
}

fn default_source_tree() -> String {
    DEFAULT_SOURCE_TREE.to_string()
}

/// Settings controlling where linked records are placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    /// Group receiving linked project references and frameworks.
    #[serde(default = "default_frameworks_group")]
    pub frameworks_group: String,

    /// Group receiving resource bundles.
    #[serde(default = "default_resources_group")]
    pub resources_group: String,

    /// Group used for bundles when `resources_group` does not exist.
    #[serde(default = "default_resources_fallback_group")]
    pub resources_fallback_group: String,

    /// Source tree written on linked project and bundle references.
    #[serde(default = "default_source_tree")]
    pub source_tree: String,

    /// Version of Xcode the projects are edited with, e.g. `"4.2"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xcode_version: Option<String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            frameworks_group: default_frameworks_group(),
            resources_group: default_resources_group(),
            resources_fallback_group: default_resources_fallback_group(),
            source_tree: default_source_tree(),
            xcode_version: None,
        }
    }
}

impl LinkConfig {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file yields [`LinkConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Writes the configuration to `path` as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        crate::utils::fs::write_text_file(path, &content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// The default configuration location.
    ///
    /// `PBXLINK_CONFIG_PATH` wins when set; otherwise `~/.pbxlink/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?;
        Ok(home.join(".pbxlink").join("config.toml"))
    }

    /// Major version parsed from `xcode_version`, or 0 when unset or invalid.
    #[must_use]
    pub fn xcode_major_version(&self) -> u32 {
        self.xcode_version
            .as_deref()
            .and_then(|v| v.split('.').next())
            .and_then(|major| major.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.frameworks_group, "Frameworks");
        assert_eq!(config.resources_group, "Resources");
        assert_eq!(config.resources_fallback_group, "Supporting Files");
        assert_eq!(config.source_tree, "SOURCE_ROOT");
        assert_eq!(config.xcode_version, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "frameworks_group = \"Libraries\"\nxcode_version = \"4.2\"\n")?;

        let config = LinkConfig::load_from(&path)?;
        assert_eq!(config.frameworks_group, "Libraries");
        assert_eq!(config.resources_group, "Resources");
        assert_eq!(config.xcode_major_version(), 4);
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "frameworks = \"x\"\n")?;

        assert!(LinkConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let temp = tempdir()?;
        let config = LinkConfig::load_with_optional(Some(temp.path().join("absent.toml")))?;
        assert_eq!(config, LinkConfig::default());
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("nested").join("config.toml");
        let config = LinkConfig {
            source_tree: "<group>".to_string(),
            ..LinkConfig::default()
        };

        config.save_to(&path)?;
        assert_eq!(LinkConfig::load_from(&path)?, config);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_override() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("env.toml");
        std::fs::write(&path, "source_tree = \"SDKROOT\"\n")?;

        // SAFETY: serialized with the other environment tests
        unsafe { std::env::set_var(CONFIG_PATH_ENV, &path) };
        let loaded = LinkConfig::load_with_optional(None);
        unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

        assert_eq!(loaded?.source_tree, "SDKROOT");
        Ok(())
    }

    #[test]
    fn test_invalid_xcode_version() {
        let config = LinkConfig {
            xcode_version: Some("beta".to_string()),
            ..LinkConfig::default()
        };
        assert_eq!(config.xcode_major_version(), 0);
    }
}
