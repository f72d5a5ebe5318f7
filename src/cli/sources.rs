//! List the files a project compiles.
//!
//! # Examples
//!
//! ```bash
//! pbxlink sources Lib/Lib.xcodeproj
//! pbxlink sources Lib/Lib.xcodeproj --headers
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::CommandContext;

/// Command to print the absolute paths of built sources or headers.
#[derive(Args, Debug)]
pub struct SourcesCommand {
    /// Path to a `.xcodeproj` directory or its `project.pbxproj`
    pub project: PathBuf,

    /// List headers instead of sources
    #[arg(long)]
    pub headers: bool,
}

impl SourcesCommand {
    /// Prints one path per line.
    pub fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        let document = ctx.open(&self.project, None)?;
        let doc = document.borrow();

        let files = if self.headers {
            doc.built_headers()?
        } else {
            doc.built_sources()?
        };

        for file in files {
            println!("{}", file.display());
        }
        Ok(())
    }
}
