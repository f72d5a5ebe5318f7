//! Add a build setting.
//!
//! The value is merged into any existing setting: an equal scalar is left
//! alone, a different scalar becomes a list, and a list gains the value.
//!
//! # Examples
//!
//! ```bash
//! pbxlink setting App/App.xcodeproj OTHER_LDFLAGS -ObjC --configuration Debug
//! pbxlink setting App/App.xcodeproj HEADER_SEARCH_PATHS '"$(SRCROOT)/../Lib"' --target App
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;

/// Command to add a build setting to one configuration or to every
/// configuration of a target.
#[derive(Args, Debug)]
pub struct SettingCommand {
    /// Path to a `.xcodeproj` directory or its `project.pbxproj`
    pub project: PathBuf,

    /// Build setting name
    pub name: String,

    /// Value to add
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Configuration label, e.g. Debug
    #[arg(short, long, conflicts_with = "target", required_unless_present = "target")]
    pub configuration: Option<String>,

    /// Apply to every configuration of this target
    #[arg(short, long)]
    pub target: Option<String>,
}

impl SettingCommand {
    /// Applies the setting and saves the project.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let document = ctx.open(&self.project, self.target.as_deref())?;
        let mut doc = document.borrow_mut();

        let scope = match (&self.configuration, &self.target) {
            (Some(configuration), _) => {
                doc.add_build_setting(configuration, &self.name, &self.value)?;
                format!("configuration {configuration}")
            }
            (None, Some(target)) => {
                doc.add_build_setting_for_target(&self.name, &self.value)?;
                format!("target {target}")
            }
            (None, None) => anyhow::bail!("Either --configuration or --target is required"),
        };

        doc.flush().with_context(|| format!("Failed to save {}", self.project.display()))?;
        println!("{} {} in {}", "Updated".green().bold(), self.name, scope);
        Ok(())
    }
}
