//! Normalized path handling and relative-path sandboxing

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Converts to the platform-native format only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Parse a user-supplied folder path that must stay inside the working
    /// directory.
    ///
    /// The input is trimmed and lexically cleaned (`.` dropped, `a/..`
    /// collapsed). Absolute paths and paths whose cleaned form starts with
    /// `..` are rejected. An input that cleans to nothing becomes `.`.
    pub fn relative(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::UnsafePath {
                path: input.to_string(),
                reason: "path is empty".into(),
            });
        }
        if is_absolute(trimmed) {
            return Err(Error::UnsafePath {
                path: trimmed.to_string(),
                reason: "folder path must be relative".into(),
            });
        }

        let cleaned = clean(trimmed);
        if cleaned == ".." || cleaned.starts_with("../") {
            return Err(Error::UnsafePath {
                path: trimmed.to_string(),
                reason: "folder path must not escape current directory".into(),
            });
        }

        Ok(Self { inner: cleaned })
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if segment_normalized.is_empty() || segment_normalized == "." {
            return self.clone();
        }
        if self.inner.is_empty() || self.inner == "." {
            return Self {
                inner: segment_normalized,
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Resolve a cleaned relative path against this path.
    pub fn resolve(&self, relative: &NormalizedPath) -> Self {
        self.join(relative.as_str())
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    // Drive-letter prefixes are absolute regardless of host platform.
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return true;
    }
    Path::new(path).is_absolute()
}

/// Lexically clean a path: drop empty and `.` segments, collapse `name/..`.
///
/// Leading `..` segments of a relative path are kept so callers can detect
/// escapes.
fn clean(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if absolute {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_collapses_parent_segments() {
        assert_eq!(clean("a/./b/../c"), "a/c");
        assert_eq!(clean("a/../../b"), "../b");
        assert_eq!(clean("./"), ".");
        assert_eq!(clean("/x/../../y"), "/y");
    }

    #[test]
    fn join_skips_dot_segments() {
        let root = NormalizedPath::new("/work");
        assert_eq!(root.join(".").as_str(), "/work");
        assert_eq!(NormalizedPath::new(".").join("a.yaml").as_str(), "a.yaml");
    }

    #[test]
    fn file_name_and_extension() {
        let p = NormalizedPath::new("boards/x/blackboard.yaml");
        assert_eq!(p.file_name(), Some("blackboard.yaml"));
        assert_eq!(p.extension(), Some("yaml"));
        assert_eq!(NormalizedPath::new("dir/.hidden").extension(), None);
    }
}
