//! Error types for graph construction

use thiserror::Error;

use crate::model::FileId;

/// Errors raised while assembling a [`crate::DependencyGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge points at a file that never made it into the graph.
    #[error("File '{dependency}' required by '{required_by}' (line {line}) does not exist")]
    UnresolvedDependency {
        dependency: FileId,
        required_by: FileId,
        line: u32,
    },
}
