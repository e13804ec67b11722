use std::collections::HashSet;

use crate::{blueprint::Blueprint, dependency_graph::DependencyGraph};

/// Orders blueprints so every dependency precedes its dependents
///
/// Fixed-point ready-set strategy: repeatedly take every not-yet-placed
/// blueprint whose full dependency set is already placed, append the batch,
/// repeat until the input is exhausted. Within a batch relative order is the
/// blueprints' input order, so resolution is deterministic for a fixed input
/// ordering. Returns indices into the input slice.
pub(crate) fn resolve_order(blueprints: &[Blueprint], graph: &DependencyGraph) -> Vec<usize> {
    let mut placed: HashSet<&str> = HashSet::with_capacity(blueprints.len());
    let mut order = Vec::with_capacity(blueprints.len());
    let mut remaining: Vec<usize> = (0..blueprints.len()).collect();

    while !remaining.is_empty() {
        let mut ready = Vec::new();
        let mut next_round = Vec::new();

        for index in remaining {
            let identity = blueprints[index].identity.as_str();
            let satisfied = graph
                .dependencies_of(identity)
                .iter()
                .all(|dep| placed.contains(dep.as_str()));

            if satisfied {
                ready.push(index);
            } else {
                next_round.push(index);
            }
        }

        if ready.is_empty() {
            // Unreachable once the cycle check has passed; the graph is
            // acyclic so every round frees at least one blueprint.
            break;
        }

        for index in ready {
            placed.insert(blueprints[index].identity.as_str());
            order.push(index);
        }
        remaining = next_round;
    }

    order
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

    fn ordered_identities(blueprints: &[Blueprint]) -> Vec<&str> {
        let graph = DependencyGraph::build(blueprints).unwrap();
        resolve_order(blueprints, &graph)
            .into_iter()
            .map(|index| blueprints[index].identity.as_str())
            .collect()
    }

    #[test]
    fn chain_resolves_leaves_first() {
        let blueprints = vec![
            simple("a", &["b"]),
            simple("b", &["c"]),
            simple("c", &[]),
        ];
        assert_eq!(ordered_identities(&blueprints), vec!["c", "b", "a"]);
    }

    #[test]
    fn dependencies_precede_dependents() {
        let blueprints = vec![
            simple("web", &["service", "metrics"]),
            simple("service", &["repo"]),
            simple("metrics", &[]),
            simple("repo", &["pool"]),
            simple("pool", &[]),
        ];

        let order = ordered_identities(&blueprints);
        let index = |name: &str| order.iter().position(|id| *id == name).unwrap();

        assert!(index("repo") < index("service"));
        assert!(index("pool") < index("repo"));
        assert!(index("service") < index("web"));
        assert!(index("metrics") < index("web"));
    }

    #[test]
    fn batches_keep_input_order() {
        let blueprints = vec![
            simple("b", &[]),
            simple("a", &[]),
            simple("top", &["a", "b"]),
        ];
        assert_eq!(ordered_identities(&blueprints), vec!["b", "a", "top"]);
    }

    #[test]
    fn same_input_resolves_identically() {
        let blueprints = vec![
            simple("a", &["b", "c"]),
            simple("b", &["d"]),
            simple("c", &["d"]),
            simple("d", &[]),
        ];
        let first = ordered_identities(&blueprints);
        let second = ordered_identities(&blueprints);
        assert_eq!(first, second);
    }
}
