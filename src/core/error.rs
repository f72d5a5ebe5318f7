//! Error handling for pbxlink
//!
//! The engine never raises: every fallible operation returns a
//! [`Result`] carrying a [`PbxError`], and diagnostics are emitted on the
//! `tracing` side channel rather than through the return value. The error
//! system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell a drifted project apart
//!    from a missing file or an inconsistent graph
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **NotFound**: an anchor, section or record the operation needs is missing
//!   from the project text ([`PbxError::NotFound`])
//! - **Inconsistent**: a structural invariant broke while resolving records
//!   ([`PbxError::Inconsistent`])
//! - **BackingStoreUnavailable**: the project file did not exist when the
//!   document was loaded ([`PbxError::BackingStoreUnavailable`])
//! - **Store and configuration failures**: [`PbxError::Io`],
//!   [`PbxError::Config`]
//!
//! Use [`user_friendly_error`] to turn any [`anyhow::Error`] into an
//! [`ErrorContext`] for display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbxlink_cli::core::{PbxError, ErrorContext};
//!
//! let context = ErrorContext::new(PbxError::NoActiveTarget {
//!     project: "App".to_string(),
//! })
//! .with_suggestion("Pass --target to select the target to link");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for project operations.
///
/// All fields are owned strings so the error is cheap to clone; lazily
/// resolved target accessors memoize failures as well as successes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PbxError {
    /// An expected anchor, section or record is missing from the project text.
    ///
    /// This usually means the project was written by a newer Xcode with a
    /// different layout, or the caller asked for a name that does not exist.
    #[error("Unable to find {what} in project '{project}'")]
    NotFound {
        /// Description of the missing text (e.g. "the Frameworks build phase")
        what: String,
        /// Name of the project being searched
        project: String,
    },

    /// A structural invariant was violated while resolving records.
    #[error("Inconsistent project '{project}': {reason}")]
    Inconsistent {
        /// What did not line up
        reason: String,
        /// Name of the project being resolved
        project: String,
    },

    /// The project file did not exist when the document was loaded.
    #[error("Project file not found: {path}")]
    BackingStoreUnavailable {
        /// Location the document was loaded from
        path: String,
    },

    /// An operation needed an active target but none was set.
    #[error("No active target set for project '{project}'")]
    NoActiveTarget {
        /// Name of the project without an active target
        project: String,
    },

    /// Reading or writing the project through the store failed.
    #[error("Failed to {operation} {path}: {reason}")]
    Io {
        /// The store operation that failed ("read" or "write")
        operation: String,
        /// Location involved in the failure
        path: String,
        /// Underlying error message
        reason: String,
    },

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// An anchored matcher could not be built from its inputs.
    #[error("Invalid search pattern: {reason}")]
    Pattern {
        /// The regex compilation failure
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl PbxError {
    /// Shorthand for [`PbxError::NotFound`].
    pub fn not_found(what: impl Into<String>, project: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            project: project.into(),
        }
    }

    /// Shorthand for [`PbxError::Inconsistent`].
    pub fn inconsistent(reason: impl Into<String>, project: impl Into<String>) -> Self {
        Self::Inconsistent {
            reason: reason.into(),
            project: project.into(),
        }
    }
}

impl From<regex::Error> for PbxError {
    fn from(error: regex::Error) -> Self {
        Self::Pattern {
            reason: error.to_string(),
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PbxError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PbxError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    ///
    /// Suggestions are displayed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    ///
    /// Details are displayed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with contextual suggestions.
///
/// Known [`PbxError`] variants get tailored suggestions; I/O and TOML errors
/// are mapped onto the closest variant; anything else is reported with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(pbx_error) = error.downcast_ref::<PbxError>() {
        return create_error_context(pbx_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return ErrorContext::new(PbxError::Io {
            operation: "access".to_string(),
            path: "unknown".to_string(),
            reason: io_error.to_string(),
        })
        .with_suggestion("Check that the path exists and that you have permission to read and write it");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PbxError::Config {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your pbxlink config file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PbxError::Other {
        message,
    })
}

fn create_error_context(error: PbxError) -> ErrorContext {
    match &error {
        PbxError::NotFound { what, .. } if what.contains("Frameworks build phase") => {
            ErrorContext::new(error)
                .with_suggestion(
                    "Add a \"Link Binary With Libraries\" build phase to the target in Xcode, then run again",
                )
                .with_details("Linked products are added to the target's Frameworks build phase")
        }
        PbxError::NotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the target and configuration names, or open and re-save the project in Xcode")
            .with_details(
                "pbxlink locates records by their text layout; a renamed object or an unusual layout hides them",
            ),
        PbxError::Inconsistent { .. } => ErrorContext::new(error)
            .with_details("Some records reference objects that could not be resolved"),
        PbxError::BackingStoreUnavailable { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the path to an .xcodeproj directory or its project.pbxproj file"),
        PbxError::NoActiveTarget { .. } => ErrorContext::new(error)
            .with_suggestion("Pass --target to choose which target to operate on"),
        PbxError::Config { .. } => ErrorContext::new(error)
            .with_suggestion("Check ~/.pbxlink/config.toml or the file named by PBXLINK_CONFIG_PATH"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = PbxError::not_found("the PBXBuildFile section", "App");
        assert_eq!(error.to_string(), "Unable to find the PBXBuildFile section in project 'App'");
    }

    #[test]
    fn test_user_friendly_frameworks_suggestion() {
        let error = anyhow::Error::from(PbxError::not_found(
            "the Frameworks build phase of target 'App'",
            "App",
        ));
        let context = user_friendly_error(error);
        assert!(context.suggestion.unwrap().contains("Link Binary With Libraries"));
    }

    #[test]
    fn test_user_friendly_generic_chain() {
        let error = anyhow::anyhow!("root").context("outer");
        let context = user_friendly_error(error);
        let message = context.error.to_string();
        assert!(message.contains("outer"));
        assert!(message.contains("Caused by:"));
        assert!(message.contains("root"));
    }

    #[test]
    fn test_error_context_display() {
        let context = ErrorContext::new(PbxError::Config {
            message: "bad".to_string(),
        })
        .with_details("d")
        .with_suggestion("s");
        assert_eq!(context.to_string(), "Configuration error: bad\nDetails: d\nSuggestion: s");
    }
}
