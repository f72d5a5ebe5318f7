//! File system and path utilities
//!
//! - [`fs`] - Text file I/O with atomic writes, lexical path normalization
//! - [`path`] - Absolutizing and relativizing paths between projects

pub mod fs;
pub mod path;

pub use fs::{atomic_write, ensure_dir, normalize_path, read_text_file, write_text_file};
pub use path::{absolutize, relative_path, to_project_path_string};
