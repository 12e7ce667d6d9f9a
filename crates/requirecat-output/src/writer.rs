//! Concatenates sorted source files into a single output file

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use requirecat_core::FileId;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Host line terminator appended after every copied line.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create the output file '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read '{}' while writing the output file: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to the output file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What ended up in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub files: usize,
    pub lines: usize,
}

/// Writes the contents of files, in the given order, to one output path.
pub struct OutputWriter {
    path: PathBuf,
}

impl OutputWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutputWriter { path: path.into() }
    }

    /// Replace the output with the concatenation of `files`.
    ///
    /// Each line is re-terminated with [`LINE_ENDING`]. The output is written
    /// incrementally, so a failure part-way leaves a truncated file behind.
    pub fn write(&self, files: &[FileId]) -> Result<WriteSummary, WriteError> {
        if self.path.is_file() {
            warn!(
                "Output file '{}' already exists, overwriting it",
                self.path.display()
            );
        }

        let write_err = |source| WriteError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::Create {
                path: self.path.clone(),
                source,
            })?;
        }

        let output = File::create(&self.path).map_err(|source| WriteError::Create {
            path: self.path.clone(),
            source,
        })?;
        let mut output = BufWriter::new(output);
        let mut summary = WriteSummary { files: 0, lines: 0 };

        for file in files {
            let lines = self.copy_lines(file, &mut output)?;
            debug!("Copied {} lines from {}", lines, file);
            summary.files += 1;
            summary.lines += lines;
        }

        output.flush().map_err(write_err)?;
        Ok(summary)
    }

    fn copy_lines(&self, file: &FileId, output: &mut impl Write) -> Result<usize, WriteError> {
        let read_err = |source| WriteError::Read {
            path: file.path().to_path_buf(),
            source,
        };

        let input = BufReader::new(File::open(file.path()).map_err(read_err)?);
        let mut count = 0;
        for line in input.lines() {
            let line = line.map_err(read_err)?;
            output
                .write_all(line.as_bytes())
                .and_then(|()| output.write_all(LINE_ENDING.as_bytes()))
                .map_err(|source| WriteError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            count += 1;
        }
        Ok(count)
    }
}
