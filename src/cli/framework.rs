//! Add a system framework to a target.
//!
//! # Examples
//!
//! ```bash
//! pbxlink framework App/App.xcodeproj --target App QuartzCore.framework
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;

/// Command to add an SDK framework.
#[derive(Args, Debug)]
pub struct FrameworkCommand {
    /// Path to a `.xcodeproj` directory or its `project.pbxproj`
    pub project: PathBuf,

    /// Target linking the framework
    #[arg(short, long)]
    pub target: String,

    /// Framework name, e.g. `QuartzCore.framework`
    pub framework: String,
}

impl FrameworkCommand {
    /// Registers the framework and saves the project.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let document = ctx.open(&self.project, Some(&self.target))?;
        let mut doc = document.borrow_mut();

        doc.add_framework(&self.framework, &ctx.config)?;
        doc.flush().with_context(|| format!("Failed to save {}", self.project.display()))?;

        println!("{} {} to {}", "Added".green().bold(), self.framework, self.target.bold());
        Ok(())
    }
}
