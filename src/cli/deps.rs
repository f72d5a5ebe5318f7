//! Show the cross-project dependencies of a target.
//!
//! Each dependency prints as its name and as `path:remoteTargetId`, the path
//! being relative to the directory holding the project.
//!
//! # Examples
//!
//! ```bash
//! pbxlink deps App/App.xcodeproj --target App
//! pbxlink deps App/App.xcodeproj --target App --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

use super::common::{CommandContext, OutputFormat};

/// Command to list the dependencies of one target.
#[derive(Args, Debug)]
pub struct DepsCommand {
    /// Path to a `.xcodeproj` directory or its `project.pbxproj`
    pub project: PathBuf,

    /// Target whose dependencies are listed
    #[arg(short, long)]
    pub target: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl DepsCommand {
    /// Prints the dependency names and paths.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let document = ctx.open(&self.project, Some(&self.target))?;
        let mut doc = document.borrow_mut();

        let names = doc.dependency_names_for_target(&self.target)?;
        let paths = doc.dependency_paths_for_target(&self.target)?;

        match self.format {
            OutputFormat::Json => {
                let output = json!({
                    "project": doc.project_name(),
                    "target": self.target,
                    "names": names,
                    "paths": paths,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if names.is_empty() && paths.is_empty() {
                    println!("{} has no project dependencies", self.target.bold());
                    return Ok(());
                }

                println!("{}", "Dependencies:".bold());
                for name in &names {
                    println!("  {}", name.green());
                }
                println!("{}", "Paths:".bold());
                for path in &paths {
                    println!("  {path}");
                }
            }
        }

        Ok(())
    }
}
