//! Backing stores for project text.
//!
//! The engine only ever reads a whole project file or writes a whole project
//! file. [`ProjectStore`] captures that boundary so documents can be backed
//! by the file system ([`FsStore`]) or by memory ([`MemoryStore`]) in tests
//! and embedders.
//!
//! Stores give no cross-process exclusion. Two processes flushing the same
//! project race, and the last writer wins.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::PbxError;
use crate::utils::fs::{read_text_file, write_text_file};

/// Whole-document read/write access to project text.
pub trait ProjectStore {
    /// Reads the text stored at `location`.
    ///
    /// Returns `Ok(None)` when nothing exists there; that is not an error.
    fn read(&self, location: &Path) -> Result<Option<String>, PbxError>;

    /// Replaces the text stored at `location`.
    fn write(&self, location: &Path, text: &str) -> Result<(), PbxError>;
}

/// Stores project text in files on disk.
///
/// Writes go through a temporary file and a rename, so a crash mid-flush
/// leaves either the old or the new project file, never a torn one.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl FsStore {
    /// Creates a file system store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProjectStore for FsStore {
    fn read(&self, location: &Path) -> Result<Option<String>, PbxError> {
        if !location.is_file() {
            debug!("No project file at {}", location.display());
            return Ok(None);
        }

        read_text_file(location).map(Some).map_err(|e| PbxError::Io {
            operation: "read".to_string(),
            path: location.display().to_string(),
            reason: format!("{e:#}"),
        })
    }

    fn write(&self, location: &Path, text: &str) -> Result<(), PbxError> {
        debug!("Writing {} bytes to {}", text.len(), location.display());

        write_text_file(location, text).map_err(|e| PbxError::Io {
            operation: "write".to_string(),
            path: location.display().to_string(),
            reason: format!("{e:#}"),
        })
    }
}

/// Keeps project text in memory and counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `location` with `text` without counting a write.
    pub fn insert(&self, location: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.borrow_mut().insert(location.into(), text.into());
    }

    /// Returns a copy of the text stored at `location`.
    #[must_use]
    pub fn get(&self, location: &Path) -> Option<String> {
        self.files.borrow().get(location).cloned()
    }

    /// Number of [`ProjectStore::write`] calls made so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ProjectStore for MemoryStore {
    fn read(&self, location: &Path) -> Result<Option<String>, PbxError> {
        Ok(self.get(location))
    }

    fn write(&self, location: &Path, text: &str) -> Result<(), PbxError> {
        self.writes.set(self.writes.get() + 1);
        self.files.borrow_mut().insert(location.to_path_buf(), text.to_string());
        Ok(())
    }
}
