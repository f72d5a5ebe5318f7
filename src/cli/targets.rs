//! List the targets of a project.
//!
//! # Examples
//!
//! ```bash
//! pbxlink targets App/App.xcodeproj
//! pbxlink targets App/App.xcodeproj --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

use super::common::{CommandContext, OutputFormat};

/// Command to list the native targets of a project.
#[derive(Args, Debug)]
pub struct TargetsCommand {
    /// Path to a `.xcodeproj` directory or its `project.pbxproj`
    pub project: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl TargetsCommand {
    /// Prints every target name with its identifier.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let document = ctx.open(&self.project, None)?;
        let mut doc = document.borrow_mut();

        let names = doc.target_names().to_vec();
        let mut rows = Vec::with_capacity(names.len());
        for name in &names {
            let id = doc.target_by_name(name).identifier()?.to_string();
            rows.push((name.clone(), id));
        }

        match self.format {
            OutputFormat::Json => {
                let targets: Vec<_> = rows.iter().map(|(name, id)| json!({ "name": name, "id": id })).collect();
                let output = json!({ "project": doc.project_name(), "targets": targets });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("{}", doc.project_name().bold());
                for (name, id) in &rows {
                    println!("  {} {}", name.green(), format!("({id})").dimmed());
                }
            }
        }

        Ok(())
    }
}
