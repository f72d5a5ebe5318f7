//! Command-line interface for pbxlink.
//!
//! The CLI is a thin layer over the library: each subcommand opens the
//! projects it names through one [`DocumentRegistry`](crate::document::DocumentRegistry),
//! runs a query or mutation, and saves what it changed.
//!
//! # Command Structure
//!
//! - `targets` - list the targets of a project
//! - `deps` - show a target's cross-project dependencies
//! - `link` - link a dependency project's target into a consumer target
//! - `setting` - add a build setting
//! - `framework` - add a system framework
//! - `sources` - list the files a project compiles
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only report errors
//! - `--config` - Use a specific configuration file
//!
//! Project arguments accept a `.xcodeproj` directory or the
//! `project.pbxproj` file inside it.
//!
//! # Examples
//!
//! ```bash
//! pbxlink targets App/App.xcodeproj
//! pbxlink --verbose link App/App.xcodeproj -t App Lib/Lib.xcodeproj -d Lib
//! pbxlink --config ./pbxlink.toml framework App/App.xcodeproj -t App QuartzCore.framework
//! ```

mod common;
mod deps;
mod framework;
mod link;
mod setting;
mod sources;
mod targets;


pub use common::{CommandContext, OutputFormat};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Main CLI structure for pbxlink.
#[derive(Parser, Debug)]
#[command(
    name = "pbxlink",
    about = "Query and link Xcode project files",
    version,
    long_about = "pbxlink edits project.pbxproj files in place: it lists targets and dependencies, \
                  links one project's library into another, and adds build settings and frameworks."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output, including every link step
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `PBXLINK_CONFIG_PATH`, then `~/.pbxlink/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the targets of a project
    Targets(targets::TargetsCommand),

    /// Show the project dependencies of a target
    Deps(deps::DepsCommand),

    /// Link a dependency project's target into a consumer target
    Link(link::LinkCommand),

    /// Add a build setting to a configuration or a target
    Setting(setting::SettingCommand),

    /// Add a system framework to a target
    Framework(framework::FrameworkCommand),

    /// List the source or header files a project builds
    Sources(sources::SourcesCommand),
}

impl Cli {
    /// Log filter for this invocation.
    ///
    /// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug`,
    /// `--quiet` selects `error` and the default is `info`.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        EnvFilter::new(self.log_level())
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Installs the `tracing` subscriber writing to stderr.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }

    /// Runs the selected command.
    ///
    /// # Errors
    /// Returns the command's error for the caller to display
    pub fn execute(self) -> Result<()> {
        let mut ctx = CommandContext::new(self.config)?;
        self.command.execute(&mut ctx)
    }

    /// Runs the selected command against an existing context.
    ///
    /// # Errors
    /// Returns the command's error for the caller to display
    pub fn execute_with_context(self, ctx: &mut CommandContext) -> Result<()> {
        self.command.execute(ctx)
    }
}

impl Commands {
    fn execute(self, ctx: &mut CommandContext) -> Result<()> {
        match self {
            Self::Targets(cmd) => cmd.execute(ctx),
            Self::Deps(cmd) => cmd.execute(ctx),
            Self::Link(cmd) => cmd.execute(ctx),
            Self::Setting(cmd) => cmd.execute(ctx),
            Self::Framework(cmd) => cmd.execute(ctx),
            Self::Sources(cmd) => cmd.execute(ctx),
        }
    }
}
