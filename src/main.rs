//! pbxlink CLI entry point
//!
//! Parses the command line, sets up logging and runs the selected command.
//! Errors are shown with details and a suggestion, and exit with status 1.

use anyhow::Result;
use clap::Parser;
use pbxlink_cli::cli;
use pbxlink_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    cli.init_logging();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
