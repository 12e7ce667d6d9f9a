//! requirecat core — file identities, the dependency graph and the topological sorter

pub mod error;
pub mod graph;
pub mod model;
pub mod sorter;


#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::GraphError;
pub use graph::DependencyGraph;
pub use model::{Declaration, FileId, Requirement};
pub use sorter::{Cycle, SortError, TopologicalSorter};

/// Sort the files of `graph` so each file follows everything it requires.
pub fn sort_files(graph: &DependencyGraph) -> Result<Vec<FileId>, SortError<FileId>> {
    TopologicalSorter::new(graph.files().cloned(), |file: &FileId| graph.dependencies(file)).sort()
}
