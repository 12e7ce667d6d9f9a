//! Breadth-first directory scan that collects `require` declarations

use std::collections::{HashSet, VecDeque};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use requirecat_core::{Declaration, DependencyGraph, FileId, GraphError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ScanConfig};
use crate::parser::{is_require_statement, parse_require_statement};

/// Fatal scan failures. Anything recoverable becomes a [`ScanWarning`].
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot resolve root directory '{}': {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A well-formed `require` names something that is not a regular file.
    #[error("({}:{line}) 'require' statement points to an invalid file '{declared}'", .file.display())]
    MissingDependency {
        file: PathBuf,
        line: u32,
        declared: String,
    },
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A `require` line that does not parse; the line was skipped.
    MalformedRequire,
    /// A file that could not be opened or read; it was left out.
    UnreadableFile,
    /// A directory whose entries could not be listed.
    UnreadableDirectory,
}

/// Non-fatal problem encountered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub line: Option<u32>,
    pub kind: WarningKind,
    pub message: String,
}

impl ScanWarning {
    /// One-line report naming the location relative to `root`.
    pub fn describe(&self, root: &Path) -> String {
        let shown = self.path.strip_prefix(root).unwrap_or(self.path.as_path()).display();
        let location = match self.line {
            Some(line) => format!("{shown}:{line}"),
            None => shown.to_string(),
        };

        match self.kind {
            WarningKind::MalformedRequire => format!(
                "({location}) Could not parse 'require' statement, skipping it: {}",
                self.message
            ),
            WarningKind::UnreadableFile => {
                format!("Can't read file '{location}', skipping it: {}", self.message)
            }
            WarningKind::UnreadableDirectory => {
                format!("Can't read directory '{location}', skipping it: {}", self.message)
            }
        }
    }
}

/// Everything a scan found.
#[derive(Debug)]
pub struct ScanReport {
    /// Canonical root directory.
    pub root: PathBuf,
    /// Output location that was excluded from the scan.
    pub output: PathBuf,
    /// Source files in discovery order with their declarations.
    pub declarations: IndexMap<FileId, Vec<Declaration>>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    pub fn file_count(&self) -> usize {
        self.declarations.len()
    }

    /// Check every declaration against the scanned file set and build the
    /// graph.
    pub fn into_graph(self) -> Result<DependencyGraph, GraphError> {
        DependencyGraph::from_declarations(self.declarations)
    }
}

/// Walks a root directory and reads every regular file's declarations.
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Scanner { config }
    }

    /// Scan the configured root.
    ///
    /// Directories are visited breadth-first, entries within a directory in
    /// file-name order. The output file is never read as a source.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        self.config.validate()?;

        let root = fs::canonicalize(&self.config.root).map_err(|source| ScanError::Root {
            path: self.config.root.clone(),
            source,
        })?;
        let output_id = FileId::from_canonical(self.config.output_path(&root));

        let mut declarations = IndexMap::new();
        let mut warnings = Vec::new();
        let mut seen_dirs = HashSet::new();
        let mut queue = VecDeque::new();

        seen_dirs.insert(root.clone());
        queue.push_back(root.clone());

        while let Some(current_dir) = queue.pop_front() {
            debug!("Processing directory: {}", current_dir.display());

            let entries = match fs::read_dir(&current_dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Cannot read directory '{}': {}", current_dir.display(), e);
                    warnings.push(ScanWarning {
                        path: current_dir.clone(),
                        line: None,
                        kind: WarningKind::UnreadableDirectory,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let mut paths: Vec<PathBuf> = entries
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry.path()),
                    Err(e) => {
                        warn!("Cannot read entry in '{}': {}", current_dir.display(), e);
                        None
                    }
                })
                .collect();
            paths.sort();

            for path in paths {
                if path.is_dir() {
                    // Symlinked directories may loop back on themselves
                    match fs::canonicalize(&path) {
                        Ok(canonical) => {
                            if seen_dirs.insert(canonical) {
                                queue.push_back(path);
                            } else {
                                debug!("Skipping already visited directory: {}", path.display());
                            }
                        }
                        Err(e) => warn!("Cannot resolve directory '{}': {}", path.display(), e),
                    }
                    continue;
                }

                if !path.is_file() {
                    continue;
                }

                let file = match FileId::canonical(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        self.skip_unreadable(&path, &e, &mut warnings);
                        continue;
                    }
                };

                if file == output_id {
                    debug!("Ignoring output file: {}", path.display());
                    continue;
                }
                if declarations.contains_key(&file) {
                    debug!("Already scanned through another path: {}", path.display());
                    continue;
                }

                if let Some(file_declarations) =
                    self.read_declarations(&root, &file, &mut warnings)?
                {
                    declarations.insert(file, file_declarations);
                }
            }
        }

        debug!("Scanned {} files under {}", declarations.len(), root.display());

        Ok(ScanReport {
            root,
            output: output_id.path().to_path_buf(),
            declarations,
            warnings,
        })
    }

    /// Read one file's `require` lines. `Ok(None)` means the file could not
    /// be read and should be left out of the graph.
    fn read_declarations(
        &self,
        root: &Path,
        file: &FileId,
        warnings: &mut Vec<ScanWarning>,
    ) -> Result<Option<Vec<Declaration>>, ScanError> {
        let handle = match File::open(file.path()) {
            Ok(handle) => handle,
            Err(e) => {
                self.skip_unreadable(file.path(), &e, warnings);
                return Ok(None);
            }
        };

        let shown = file.relative_to(root);
        let mut file_declarations = Vec::new();

        for (index, line) in BufReader::new(handle).lines().enumerate() {
            let line_number = index as u32 + 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.skip_unreadable(file.path(), &e, warnings);
                    return Ok(None);
                }
            };

            if !is_require_statement(&line) {
                continue;
            }

            let declared = match parse_require_statement(&line) {
                Ok(declared) => declared,
                Err(e) => {
                    debug!("Malformed 'require' at {}:{}", shown.display(), line_number);
                    warnings.push(ScanWarning {
                        path: file.path().to_path_buf(),
                        line: Some(line_number),
                        kind: WarningKind::MalformedRequire,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let missing = || ScanError::MissingDependency {
                file: shown.to_path_buf(),
                line: line_number,
                declared: declared.to_string(),
            };

            // Paths resolve against the root, not the declaring file
            let target_path = root.join(declared);
            if !target_path.is_file() {
                return Err(missing());
            }
            let target = FileId::canonical(&target_path).map_err(|_| missing())?;

            file_declarations.push(Declaration::new(target, line_number, declared));
        }

        Ok(Some(file_declarations))
    }

    fn skip_unreadable(&self, path: &Path, error: &std::io::Error, warnings: &mut Vec<ScanWarning>) {
        debug!("Unreadable file {}: {}", path.display(), error);
        warnings.push(ScanWarning {
            path: path.to_path_buf(),
            line: None,
            kind: WarningKind::UnreadableFile,
            message: error.to_string(),
        });
    }
}
