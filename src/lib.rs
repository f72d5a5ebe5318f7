//! pbxlink - query and link Xcode project files
//!
//! pbxlink reads and edits `project.pbxproj` files directly as text. It does
//! not parse the property-list format into an object graph: every query and
//! edit is an anchored pattern over the raw text, and every edit is a splice
//! that leaves the rest of the file byte-for-byte unchanged. That keeps diffs
//! minimal and preserves whatever formatting Xcode or a person left behind.
//!
//! # Architecture Overview
//!
//! - A [`Document`](document::Document) owns the text of one project file,
//!   loaded and saved through a [`ProjectStore`](store::ProjectStore).
//! - A [`DocumentRegistry`](document::DocumentRegistry) hands out one shared
//!   document per project location.
//! - A [`TargetView`](target::TargetView) resolves a native target's
//!   identifier, configurations, build phases, dependencies and product on
//!   demand, caching each answer until the text changes.
//! - The [`mutations`] module adds the idempotent edit primitives: file
//!   references, build files, group and phase membership, build settings.
//! - The [`linker`] composes those primitives to link one project's target
//!   into another's.
//!
//! New records get identifiers from an [`IdentifierFamily`](ident::IdentifierFamily)
//! derived from a stable seed, so repeating an operation finds the records it
//! made the first time instead of adding duplicates.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Group and source-tree settings (`~/.pbxlink/config.toml`)
//! - [`constants`] - Identifier sizes and well-known section names
//! - [`core`] - Error types and user-facing error display
//! - [`document`] - Project documents and the registry
//! - [`ident`] - Deterministic identifier families
//! - [`linker`] - Cross-project dependency linking
//! - [`mutations`] - Edit primitives on documents
//! - [`store`] - Backing stores for project text
//! - [`target`] - Lazily resolved target views
//! - [`utils`] - Path and file helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use pbxlink_cli::document::DocumentRegistry;
//!
//! # fn example() -> Result<(), pbxlink_cli::core::PbxError> {
//! let mut registry = DocumentRegistry::with_filesystem();
//! let app = registry.get("App/App.xcodeproj/project.pbxproj")?;
//!
//! let mut app = app.borrow_mut();
//! for name in app.dependency_names_for_target("App")? {
//!     println!("App depends on {name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod ident;
pub mod linker;
pub mod mutations;
pub mod store;
pub mod target;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
