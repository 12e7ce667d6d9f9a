//! Depth-first topological sorter with cycle reporting
//!
//! Classic three-colour DFS run on an explicit work stack instead of the
//! call stack, so deep dependency chains cannot overflow. Roots are taken in
//! the order the nodes were supplied, which keeps a run reproducible.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting,
    Visited,
}

/// One pending node on the work stack.
struct Frame<N> {
    node: N,
    dependencies: Vec<N>,
    next: usize,
}

/// A concrete circular dependency.
///
/// `nodes()[i]` depends on `nodes()[i + 1]`, and the last node depends on the
/// first, so following the edges from any member leads back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<N> {
    nodes: Vec<N>,
}

impl<N> Cycle<N> {
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Members ordered so that each one is required by the next.
    pub fn required_by_chain(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().rev()
    }

    /// Multi-line "required by" rendering, closed back onto the first node:
    ///
    /// ```text
    /// c.txt
    ///     <- b.txt
    ///     <- a.txt
    ///     <- c.txt
    ///     <- ...
    /// ```
    pub fn render(&self, mut label: impl FnMut(&N) -> String) -> String {
        let mut chain = self.required_by_chain();
        let Some(first) = chain.next() else {
            return String::new();
        };
        let first = label(first);

        let mut out = first.clone();
        for node in chain {
            out.push_str("\n\t<- ");
            out.push_str(&label(node));
        }
        out.push_str("\n\t<- ");
        out.push_str(&first);
        out.push_str("\n\t<- ...");
        out
    }
}

/// Why a sort produced no order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError<N> {
    /// The nodes contain a circular dependency.
    Cycle(Cycle<N>),
    /// The dependency lookup returned a node outside the node set.
    UnknownDependency { node: N, dependency: N },
}

impl<N: fmt::Debug> fmt::Display for SortError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::Cycle(cycle) => {
                write!(f, "circular dependency across {} nodes", cycle.len())
            }
            SortError::UnknownDependency { node, dependency } => {
                write!(f, "{node:?} depends on {dependency:?}, which is not being sorted")
            }
        }
    }
}

impl<N: fmt::Debug> std::error::Error for SortError<N> {}

/// Orders `nodes` so every node comes after everything it depends on.
///
/// `dependencies` is consulted at most once per node and should return the
/// direct dependencies in the order they ought to be visited.
pub struct TopologicalSorter<N, F> {
    nodes: Vec<N>,
    dependencies: F,
}

impl<N, F> TopologicalSorter<N, F>
where
    N: Clone + Eq + Hash,
    F: Fn(&N) -> Vec<N>,
{
    pub fn new(nodes: impl IntoIterator<Item = N>, dependencies: F) -> Self {
        TopologicalSorter {
            nodes: nodes.into_iter().collect(),
            dependencies,
        }
    }

    /// Produce a dependency-first order containing every node exactly once,
    /// or the first cycle encountered.
    pub fn sort(&self) -> Result<Vec<N>, SortError<N>> {
        let mut states: IndexMap<N, VisitState> = self
            .nodes
            .iter()
            .map(|node| (node.clone(), VisitState::Unvisited))
            .collect();
        let mut sorted = Vec::with_capacity(states.len());
        let mut stack: Vec<Frame<N>> = Vec::new();

        for root in 0..states.len() {
            if states[root] != VisitState::Unvisited {
                continue;
            }
            states[root] = VisitState::Visiting;
            let node = states.get_index(root).map(|(node, _)| node.clone());
            let Some(node) = node else { continue };
            stack.push(self.frame(node));

            while let Some(frame) = stack.last_mut() {
                if frame.next >= frame.dependencies.len() {
                    let Some(done) = stack.pop() else { break };
                    if let Some(state) = states.get_mut(&done.node) {
                        *state = VisitState::Visited;
                    }
                    sorted.push(done.node);
                    continue;
                }

                let dependency = frame.dependencies[frame.next].clone();
                frame.next += 1;

                match states.get(&dependency).copied() {
                    Some(VisitState::Visited) => {}
                    Some(VisitState::Unvisited) => {
                        if let Some(state) = states.get_mut(&dependency) {
                            *state = VisitState::Visiting;
                        }
                        stack.push(self.frame(dependency));
                    }
                    Some(VisitState::Visiting) => {
                        return Err(SortError::Cycle(close_cycle(&stack, &dependency)));
                    }
                    None => {
                        return Err(SortError::UnknownDependency {
                            node: frame.node.clone(),
                            dependency,
                        });
                    }
                }
            }
        }

        Ok(sorted)
    }

    fn frame(&self, node: N) -> Frame<N> {
        let dependencies = (self.dependencies)(&node);
        Frame {
            node,
            dependencies,
            next: 0,
        }
    }
}

/// The active path from `repeated` to the top of the stack.
fn close_cycle<N: Clone + Eq>(stack: &[Frame<N>], repeated: &N) -> Cycle<N> {
    let start = stack
        .iter()
        .position(|frame| &frame.node == repeated)
        .unwrap_or(0);
    Cycle {
        nodes: stack[start..].iter().map(|frame| frame.node.clone()).collect(),
    }
}
