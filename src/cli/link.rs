//! Link one project's target into another's.
//!
//! Wires the dependency's product into the consumer target: project
//! reference, target dependency, product group and Frameworks phase entry.
//! Running the same link again leaves the project file untouched.
//!
//! # Examples
//!
//! ```bash
//! pbxlink link App/App.xcodeproj --target App Lib/Lib.xcodeproj --dependency-target Lib
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::linker::link_dependency;

/// Command to link a dependency project into a consumer project.
#[derive(Args, Debug)]
pub struct LinkCommand {
    /// The consumer project
    pub project: PathBuf,

    /// Consumer target receiving the dependency
    #[arg(short, long)]
    pub target: String,

    /// The dependency project
    pub dependency: PathBuf,

    /// Dependency target whose product is linked
    #[arg(short = 'd', long)]
    pub dependency_target: String,
}

impl LinkCommand {
    /// Runs the link and reports the records it produced.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let consumer = ctx.open(&self.project, Some(&self.target))?;
        let dependency = ctx.open(&self.dependency, Some(&self.dependency_target))?;

        let outcome = link_dependency(&consumer, &dependency, &ctx.config).with_context(|| {
            format!(
                "Failed to link {} into {}",
                self.dependency.display(),
                self.project.display()
            )
        })?;

        println!(
            "{} {} ({}) into {}",
            "Linked".green().bold(),
            outcome.product_name,
            outcome.relative_path,
            self.target.bold()
        );
        Ok(())
    }
}
