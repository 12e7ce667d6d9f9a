//! Scan configuration

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Output file name used when none is given, relative to the root.
pub const DEFAULT_OUTPUT: &str = "out.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{}' is not a valid directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("'{path}' is not a valid path")]
    InvalidOutputPath { path: String },
}

/// Where to scan and where to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory the walk starts from and `require` paths resolve against.
    pub root: PathBuf,
    /// Output location relative to `root`. Never treated as a source.
    pub output: PathBuf,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ScanConfig {
            root: root.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Fail unless `root` is an existing directory and `output` stays
    /// anchored under it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.root.clone(),
            });
        }
        if !is_anchored_file_path(&self.output) {
            return Err(ConfigError::InvalidOutputPath {
                path: self.output.display().to_string(),
            });
        }
        Ok(())
    }

    /// Output location under the canonical `root`, resolved through
    /// symlinks as far as it exists so it compares equal to scanned paths.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        let joined = root.join(&self.output);
        if let Ok(canonical) = fs::canonicalize(&joined) {
            return canonical;
        }
        if let (Some(parent), Some(name)) = (joined.parent(), joined.file_name()) {
            if let Ok(parent) = fs::canonicalize(parent) {
                return parent.join(name);
            }
        }
        // Nothing on disk yet, so nothing under the root can collide with it
        joined
    }
}

/// Relative, names a file, and never climbs out with `..`.
fn is_anchored_file_path(path: &Path) -> bool {
    !path.is_absolute()
        && path.file_name().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Accept a user-supplied output path: non-empty, no NUL bytes, relative
/// and free of `..` so it stays anchored at the root.
pub fn validate_output_path(raw: &str) -> Result<PathBuf, ConfigError> {
    let path = Path::new(raw);
    if raw.is_empty() || raw.contains('\0') || !is_anchored_file_path(path) {
        return Err(ConfigError::InvalidOutputPath {
            path: raw.to_string(),
        });
    }

    Ok(path.to_path_buf())
}
