//! Generic depth-first topological sort
//!
//! Works over any node type with equality and hashing. Nodes are visited in
//! the order given, and each node's dependencies in the order returned by
//! the adjacency closure, so the output is fully determined by the inputs.

use std::collections::HashMap;
use std::hash::Hash;

/// A dependency cycle, as the path `[a, b, ..., a]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<N> {
    pub path: Vec<N>,
}

impl<N: std::fmt::Display> std::fmt::Display for Cycle<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.path.iter().map(|n| n.to_string()).collect();
        write!(f, "Circular dependency detected: {}", parts.join(" -> "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the active recursion path
    InProgress,
    Done,
}

/// Sort `nodes` so every dependency precedes its dependents
///
/// `dependencies_of` returns the nodes a node depends on. Dependencies that
/// are not in `nodes` are still emitted (before their dependents); a node the
/// closure knows nothing about simply has no dependencies. A node listed as
/// its own dependency is ignored rather than reported as a cycle.
pub fn topological_sort<N, F, I>(nodes: &[N], mut dependencies_of: F) -> Result<Vec<N>, Cycle<N>>
where
    N: Eq + Hash + Clone,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut marks: HashMap<N, Mark> = HashMap::with_capacity(nodes.len());
    let mut path: Vec<N> = Vec::new();
    let mut sorted = Vec::with_capacity(nodes.len());

    for node in nodes {
        visit(node, &mut dependencies_of, &mut marks, &mut path, &mut sorted)?;
    }

    Ok(sorted)
}

fn visit<N, F, I>(
    node: &N,
    dependencies_of: &mut F,
    marks: &mut HashMap<N, Mark>,
    path: &mut Vec<N>,
    sorted: &mut Vec<N>,
) -> Result<(), Cycle<N>>
where
    N: Eq + Hash + Clone,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    match marks.get(node) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path.iter().position(|n| n == node).unwrap_or(0);
            let mut cycle: Vec<N> = path[start..].to_vec();
            cycle.push(node.clone());
            return Err(Cycle { path: cycle });
        }
        None => {}
    }

    marks.insert(node.clone(), Mark::InProgress);
    path.push(node.clone());

    let dependencies: Vec<N> = dependencies_of(node).into_iter().collect();
    for dependency in &dependencies {
        // Self-reference (tree structures): rows of the same table, not an ordering constraint
        if dependency == node {
            continue;
        }
        visit(dependency, dependencies_of, marks, path, sorted)?;
    }

    path.pop();
    marks.insert(node.clone(), Mark::Done);
    sorted.push(node.clone());
    Ok(())
}
