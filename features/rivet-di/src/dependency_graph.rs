use std::collections::{HashMap, HashSet};

use crate::{
    blueprint::Blueprint,
    errors::{BootError, GraphError, GraphErrors},
};

/// Adjacency over blueprint identities
///
/// Built once from the blueprint set and immutable afterwards; drives the
/// cycle check and the topological resolver.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Identities in blueprint input order
    order: Vec<String>,
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Records every blueprint's dependency list
    ///
    /// Duplicate identities and unresolved references are collected and
    /// reported together, before any cycle analysis runs.
    pub fn build(blueprints: &[Blueprint]) -> Result<Self, GraphErrors> {
        let mut order = Vec::with_capacity(blueprints.len());
        let mut edges: HashMap<String, Vec<String>> = HashMap::new();
        let mut errors = Vec::new();

        for blueprint in blueprints {
            let dependencies = blueprint
                .dependencies()
                .iter()
                .map(|dep| dep.to_string())
                .collect();

            if edges.insert(blueprint.identity.clone(), dependencies).is_some() {
                errors.push(GraphError::DuplicateIdentity(blueprint.identity.clone()));
            } else {
                order.push(blueprint.identity.clone());
            }
        }

        for blueprint in blueprints {
            for dependency in blueprint.dependencies() {
                if !edges.contains_key(dependency) {
                    errors.push(GraphError::MissingDependency {
                        dependency: dependency.to_string(),
                        required_by: blueprint.identity.clone(),
                    });
                }
            }
        }

        if !errors.is_empty() {
            return Err(GraphErrors { errors });
        }

        Ok(Self { order, edges })
    }

    pub fn dependencies_of(&self, identity: &str) -> &[String] {
        self.edges.get(identity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walks the whole graph and reports every independent cycle at once
    ///
    /// Each cycle is an arrow-joined identity chain returning to its first
    /// node; chains are enumerated in discovery order in the error message.
    pub fn check_cycles(&self) -> Result<(), BootError> {
        let mut visited = HashSet::new();
        let mut cycles = Vec::new();

        for identity in &self.order {
            if !visited.contains(identity.as_str()) {
                let mut path = Vec::new();
                self.walk(identity, &mut visited, &mut path, &mut cycles);
            }
        }

        if cycles.is_empty() {
            Ok(())
        } else {
            Err(BootError::CircularDependency { cycles })
        }
    }

    fn walk<'a>(
        &'a self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<String>,
    ) {
        // A node already on the current path closes a cycle: record the
        // sub-path from its first occurrence and keep walking elsewhere.
        if let Some(start) = path.iter().position(|on_path| *on_path == node) {
            let mut chain = path[start..].to_vec();
            chain.push(node);
            cycles.push(chain.join("->"));
            return;
        }

        // Globally visited nodes are not re-walked; diamond-shaped sharing
        // is not a cycle.
        if !visited.insert(node) {
            return;
        }

        path.push(node);
        for dependency in self.dependencies_of(node) {
            self.walk(dependency, visited, path, cycles);
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::Blueprint;

    struct Node;

    fn simple(identity: &str, deps: &[&str]) -> Blueprint {
        Blueprint::component::<Node>(identity)
            .constructor(deps, |_| Ok(Node))
            .build()
            .unwrap()
    }

    #[test]
    fn acyclic_graph_passes() {
        let blueprints = vec![
            simple("a", &["b"]),
            simple("b", &["c"]),
            simple("c", &[]),
        ];
        let graph = DependencyGraph::build(&blueprints).unwrap();
        graph.check_cycles().unwrap();
    }

    #[test]
    fn missing_dependency_is_reported_per_reference() {
        let blueprints = vec![simple("a", &["ghost"]), simple("b", &["ghost"])];
        let errors = DependencyGraph::build(&blueprints).unwrap_err();

        assert_eq!(errors.errors.len(), 2);
        assert_eq!(
            errors.errors[0],
            GraphError::MissingDependency {
                dependency: "ghost".into(),
                required_by: "a".into(),
            }
        );
    }

    #[test]
    fn duplicate_identity_is_a_build_error() {
        let blueprints = vec![simple("a", &[]), simple("a", &[])];
        let errors = DependencyGraph::build(&blueprints).unwrap_err();

        assert_eq!(errors.errors, vec![GraphError::DuplicateIdentity("a".into())]);
    }

    #[test]
    fn two_node_cycle_reports_the_full_chain() {
        let blueprints = vec![simple("a", &["b"]), simple("b", &["a"])];
        let graph = DependencyGraph::build(&blueprints).unwrap();
        let err = graph.check_cycles().unwrap_err();

        assert!(err.to_string().contains("0: a->b->a"), "got: {err}");
    }

    #[test]
    fn independent_cycles_are_enumerated_separately() {
        let blueprints = vec![
            simple("x", &["y"]),
            simple("y", &["x"]),
            simple("p", &["q"]),
            simple("q", &["p"]),
        ];
        let graph = DependencyGraph::build(&blueprints).unwrap();
        let err = graph.check_cycles().unwrap_err();

        let message = err.to_string();
        assert!(message.contains("0: x->y->x"), "got: {message}");
        assert!(message.contains("1: p->q->p"), "got: {message}");
    }

    #[test]
    fn diamond_sharing_is_not_a_cycle() {
        let blueprints = vec![
            simple("a", &["b", "c"]),
            simple("b", &["d"]),
            simple("c", &["d"]),
            simple("d", &[]),
        ];
        let graph = DependencyGraph::build(&blueprints).unwrap();
        graph.check_cycles().unwrap();
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let blueprints = vec![simple("a", &["a"])];
        let graph = DependencyGraph::build(&blueprints).unwrap();
        let err = graph.check_cycles().unwrap_err();

        assert!(err.to_string().contains("0: a->a"), "got: {err}");
    }
}
