//! File system helpers backing the filesystem project store.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pbxlink_cli::utils::fs::{read_text_file, write_text_file};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let path = Path::new("App.xcodeproj/project.pbxproj");
//! let text = read_text_file(path)?;
//! write_text_file(path, &text)?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }

    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Writes `content` to `path` through a temporary file in the same directory.
///
/// The temporary file is synced and then renamed over the destination, so a
/// reader never sees a half-written project file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written, synced
/// or persisted.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Lexically normalizes a path, removing `.` and resolving `..` components.
///
/// The file system is not consulted, so symlinks are not resolved.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                components.pop();
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Reads a text file with proper error handling and context.
///
/// # Errors
///
/// Returns an error with context if the file cannot be read.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Writes a text file atomically with proper error handling.
///
/// # Errors
///
/// Returns an error with context if the file cannot be written.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
