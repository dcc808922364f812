//! Export ordering
//!
//! This module provides functions to:
//! - Resolve model associations into dependency sets (including polymorphic ones)
//! - Build a dependency graph and sort it topologically
//! - Collapse duplicate many-to-many join models
//!
//! Everything here is pure and synchronous over the metadata provider.

pub mod collapse;
pub mod graph;
pub mod resolver;
pub mod topo;

pub use collapse::collapse;
pub use graph::DependencyGraph;
pub use resolver::{resolve, resolve_transitive, PolymorphicIndex, ResolvedDependencies};
pub use topo::{topological_sort, Cycle};

use std::collections::HashSet;

use crate::error::{OrderingError, OrderingResult};
use crate::schema::{MetadataProvider, Model};

/// Compute the export order for `models`
///
/// Associations are resolved transitively against every candidate the
/// provider knows, so models referenced by the selection (directly or through
/// other referents) are included even when they were not selected themselves.
/// Independent models keep their input order.
pub fn dependency_order<P: MetadataProvider + ?Sized>(
    provider: &P,
    models: &[Model],
) -> OrderingResult<Vec<Model>> {
    dependency_order_excluding(provider, models, &HashSet::new())
}

/// Like [`dependency_order`], but models in `excluded` never appear in the
/// result, even when something in the selection references them
pub fn dependency_order_excluding<P: MetadataProvider + ?Sized>(
    provider: &P,
    models: &[Model],
    excluded: &HashSet<Model>,
) -> OrderingResult<Vec<Model>> {
    let candidates = provider.candidate_models();
    let resolved = resolve_transitive(provider, &candidates, models, excluded)?;
    let graph = DependencyGraph::from_resolved(&resolved);

    log::debug!(
        "Dependency graph: {} models ({} selected, {} excluded), {} edges",
        graph.nodes.len(),
        models.len(),
        excluded.len(),
        graph.edge_count()
    );
    for model in graph.self_referencing() {
        log::debug!("{} references itself; its rows are exported together", model.name);
    }

    let sorted = graph
        .insert_order()
        .map_err(|cycle| OrderingError::CyclicDependency {
            cycle: cycle.path.into_iter().map(|m| m.name).collect(),
        })?;

    let ordered = collapse(provider, &sorted)?;
    if ordered.len() < sorted.len() {
        log::info!(
            "Collapsed {} duplicate join model(s)",
            sorted.len() - ordered.len()
        );
    }

    Ok(ordered)
}
