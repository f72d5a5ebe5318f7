//! Test utilities for pbxlink
//!
//! - [`fixtures`] holds sample project files and helpers to write them into
//!   temporary directories.
//! - [`init_test_logging`] turns on `tracing` output for a test run.
//!
//! # Example
//!
//! ```rust,no_run
//! use pbxlink_cli::test_utils::fixtures::ProjectFixture;
//!
//! # fn example() -> anyhow::Result<()> {
//! let temp = tempfile::tempdir()?;
//! let app = ProjectFixture::app().write_to(temp.path())?;
//! assert!(app.join("project.pbxproj").exists());
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::ProjectFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=pbxlink_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}
