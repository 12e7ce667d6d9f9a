//! Dependency graph wrapper over petgraph::DiGraph keyed by FileId

use crate::error::GraphError;
use crate::model::*;
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Files and their direct dependencies. An edge `a -> b` means `a` requires
/// `b` to be emitted first.
///
/// Built once from a declaration table and never mutated afterwards. Every
/// edge target is guaranteed to be a node.
pub struct DependencyGraph {
    inner: DiGraph<FileId, Requirement>,
    index: IndexMap<FileId, NodeIndex>,
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("file_count", &self.inner.node_count())
            .field("dependency_count", &self.inner.edge_count())
            .finish()
    }
}

impl DependencyGraph {
    /// Build the graph from per-file declarations.
    ///
    /// All keys become nodes first; edges are added in a second pass so a
    /// declaration may reference a file that appears later in the table.
    /// A target that is not a key fails the whole build.
    pub fn from_declarations(
        declarations: IndexMap<FileId, Vec<Declaration>>,
    ) -> Result<Self, GraphError> {
        let mut inner = DiGraph::with_capacity(declarations.len(), 0);
        let mut index = IndexMap::with_capacity(declarations.len());

        for file in declarations.keys() {
            let idx = inner.add_node(file.clone());
            index.insert(file.clone(), idx);
        }

        for (file, file_declarations) in declarations {
            let source = index[&file];
            for declaration in file_declarations {
                let Some(&target) = index.get(&declaration.target) else {
                    return Err(GraphError::UnresolvedDependency {
                        dependency: declaration.target,
                        required_by: file,
                        line: declaration.requirement.line,
                    });
                };
                inner.add_edge(source, target, declaration.requirement);
            }
        }

        tracing::debug!(
            "Dependency graph built: {} files, {} edges",
            inner.node_count(),
            inner.edge_count()
        );

        Ok(DependencyGraph { inner, index })
    }

    /// Total number of files.
    pub fn file_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all files in discovery order.
    pub fn files(&self) -> impl Iterator<Item = &FileId> {
        self.index.keys()
    }

    /// Outgoing edges of `file` paired with where they were declared, in
    /// declaration order. Empty for unknown files.
    pub fn requirements(&self, file: &FileId) -> Vec<(&FileId, &Requirement)> {
        let Some(&idx) = self.index.get(file) else {
            return Vec::new();
        };

        // petgraph yields outgoing edges newest first
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge_ref| (&self.inner[edge_ref.target()], edge_ref.weight()))
            .collect();
        edges.sort_by_key(|(_, requirement)| requirement.line);
        edges
    }

    /// Direct dependencies of `file` in the order they were declared.
    pub fn dependencies(&self, file: &FileId) -> Vec<FileId> {
        self.requirements(file)
            .into_iter()
            .map(|(target, _)| target.clone())
            .collect()
    }
}
