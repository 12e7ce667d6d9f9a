//! Core data structures for the dependency graph

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Canonical handle to a file on disk.
///
/// Two ids are equal iff they name the same file. Build them with
/// [`FileId::canonical`] so that `a/../b.txt` and `b.txt` collapse to one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileId(PathBuf);

impl FileId {
    /// Normalize `path` through the host filesystem (symlinks resolved).
    pub fn canonical(path: impl AsRef<Path>) -> std::io::Result<Self> {
        std::fs::canonicalize(path).map(FileId)
    }

    /// Wrap a path the caller has already normalized.
    pub fn from_canonical(path: impl Into<PathBuf>) -> Self {
        FileId(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path relative to `root` for display, or the full path if the file
    /// lives outside of it.
    pub fn relative_to(&self, root: &Path) -> &Path {
        self.0.strip_prefix(root).unwrap_or(&self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FileId {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Where a dependency was declared. Carried as the edge weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    /// 1-based line of the `require` statement.
    pub line: u32,
    /// The path exactly as written between the quotes.
    pub declared: String,
}

/// A resolved `require` statement that has not yet been checked against the
/// rest of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub target: FileId,
    pub requirement: Requirement,
}

impl Declaration {
    pub fn new(target: FileId, line: u32, declared: impl Into<String>) -> Self {
        Declaration {
            target,
            requirement: Requirement {
                line,
                declared: declared.into(),
            },
        }
    }
}
