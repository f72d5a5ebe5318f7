//! Path helpers used to key documents and relativize project references.

use std::path::{Component, Path, PathBuf};

use super::fs::normalize_path;

/// Makes `path` absolute against the current directory and normalizes it.
///
/// Purely lexical: the path does not need to exist.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&absolute)
}

/// Computes the path of `to` relative to the directory `from_dir`.
///
/// Both paths are absolutized first. When they share no common root (for
/// example different Windows drives) the absolute `to` is returned.
///
/// ```rust
/// use pbxlink_cli::utils::path::relative_path;
/// use std::path::{Path, PathBuf};
///
/// let rel = relative_path(Path::new("/work/App"), Path::new("/work/Lib/Lib.xcodeproj"));
/// assert_eq!(rel, PathBuf::from("../Lib/Lib.xcodeproj"));
/// ```
#[must_use]
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from = absolutize(from_dir);
    let to = absolutize(to);

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts.iter().zip(&to_parts).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return to;
    }

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Renders a path with forward slashes, the separator project files use.
#[must_use]
pub fn to_project_path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_sibling() {
        let rel = relative_path(Path::new("/src/apps/App"), Path::new("/src/libs/Lib/Lib.xcodeproj"));
        assert_eq!(rel, PathBuf::from("../../libs/Lib/Lib.xcodeproj"));
    }

    #[test]
    fn test_relative_nested() {
        let rel = relative_path(Path::new("/src/App"), Path::new("/src/App/vendor/Lib.xcodeproj"));
        assert_eq!(rel, PathBuf::from("vendor/Lib.xcodeproj"));
    }

    #[test]
    fn test_relative_same_dir() {
        assert_eq!(relative_path(Path::new("/src/App"), Path::new("/src/App")), PathBuf::from("."));
    }

    #[test]
    fn test_relative_with_dot_segments() {
        let rel = relative_path(Path::new("/src/App/./"), Path::new("/src/App/../Lib/Lib.xcodeproj"));
        assert_eq!(rel, PathBuf::from("../Lib/Lib.xcodeproj"));
    }

    #[test]
    fn test_project_path_string() {
        assert_eq!(to_project_path_string(Path::new("../Lib/Lib.xcodeproj")), "../Lib/Lib.xcodeproj");
    }
}
