//! Dependency graph built from resolved associations

use std::collections::{HashMap, HashSet};

use super::resolver::ResolvedDependencies;
use super::topo::{topological_sort, Cycle};
use crate::schema::Model;

/// Dependency graph for a set of models
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Every node, dependents first, then referent-only models in first-seen order
    pub nodes: Vec<Model>,
    /// Adjacency list: model -> models it depends on
    pub dependencies: HashMap<Model, Vec<Model>>,
}

impl DependencyGraph {
    /// Build the graph, adding referent-only models as nodes with no dependencies
    pub fn from_resolved(resolved: &ResolvedDependencies) -> Self {
        let mut graph = DependencyGraph::default();
        let mut seen: HashSet<Model> = HashSet::new();

        for (model, deps) in &resolved.entries {
            if seen.insert(model.clone()) {
                graph.nodes.push(model.clone());
            }
            graph.dependencies.insert(model.clone(), deps.clone());
        }

        for (_, deps) in &resolved.entries {
            for dep in deps {
                if seen.insert(dep.clone()) {
                    graph.nodes.push(dep.clone());
                    graph.dependencies.insert(dep.clone(), Vec::new());
                }
            }
        }

        graph
    }

    pub fn dependencies_of(&self, model: &Model) -> &[Model] {
        self.dependencies
            .get(model)
            .map(|deps| deps.as_slice())
            .unwrap_or(&[])
    }

    /// Models that reference themselves (e.g. a `parent` association)
    pub fn self_referencing(&self) -> Vec<&Model> {
        self.nodes
            .iter()
            .filter(|m| self.dependencies_of(m).contains(m))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(|deps| deps.len()).sum()
    }

    /// Insert order: dependencies before dependents
    pub fn insert_order(&self) -> Result<Vec<Model>, Cycle<Model>> {
        topological_sort(&self.nodes, |model| self.dependencies_of(model).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str) -> Model {
        Model::new(name, format!("{}s", name.to_lowercase()))
    }

    fn resolved(entries: Vec<(&str, Vec<&str>)>) -> ResolvedDependencies {
        ResolvedDependencies {
            entries: entries
                .into_iter()
                .map(|(m, deps)| (model(m), deps.into_iter().map(model).collect()))
                .collect(),
        }
    }

    #[test]
    fn test_referent_only_models_become_nodes() {
        let graph = DependencyGraph::from_resolved(&resolved(vec![("Comment", vec!["Post", "Photo"])]));

        assert_eq!(graph.nodes, vec![model("Comment"), model("Post"), model("Photo")]);
        assert!(graph.dependencies_of(&model("Post")).is_empty());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_insert_order_simple() {
        let graph = DependencyGraph::from_resolved(&resolved(vec![
            ("child", vec!["parent"]),
            ("parent", vec![]),
        ]));
        let order = graph.insert_order().unwrap();

        let parent_pos = order.iter().position(|m| m.name == "parent").unwrap();
        let child_pos = order.iter().position(|m| m.name == "child").unwrap();
        assert!(parent_pos < child_pos);
    }

    #[test]
    fn test_self_reference_reported_and_sortable() {
        let graph = DependencyGraph::from_resolved(&resolved(vec![("account", vec!["account"])]));

        assert_eq!(graph.self_referencing(), vec![&model("account")]);
        assert_eq!(graph.insert_order().unwrap(), vec![model("account")]);
    }

    #[test]
    fn test_cycle_detected() {
        let graph = DependencyGraph::from_resolved(&resolved(vec![
            ("a", vec!["b"]),
            ("b", vec!["a"]),
        ]));
        let cycle = graph.insert_order().unwrap_err();

        assert_eq!(cycle.path, vec![model("a"), model("b"), model("a")]);
    }
}
