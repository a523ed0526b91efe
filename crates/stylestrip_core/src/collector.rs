use log::{debug, trace};
use std::collections::HashSet;

use crate::{
    graph::ModuleGraph,
    types::{Module, ModuleId},
};

/// Module ids already descended into during one collection.
pub type VisitedSet = HashSet<ModuleId>;

/// Collects the source resources reachable from an entry module.
///
/// A fresh [`VisitedSet`] is created for every call. The graph may be rebuilt between
/// compilation passes, so membership must never outlive a single traversal.
///
/// # Arguments
/// * `graph` - The module graph owning every module
/// * `entry` - The module to start from
///
/// # Returns
/// Resource paths in depth-first, edge order. An unknown entry yields an empty list.
pub fn collect_entry_resources(graph: &ModuleGraph, entry: ModuleId) -> Vec<String> {
    let Some(module) = graph.get(entry) else {
        debug!("Entry module {} not found in graph", entry);
        return Vec::new();
    };

    let mut visited = VisitedSet::new();
    let resources = collect_resources(graph, module, &mut visited);
    debug!(
        "Collected {} resources from entry {} ({} modules visited)",
        resources.len(),
        entry,
        visited.len()
    );
    resources
}

/// Depth-first walk behind [`collect_entry_resources`].
///
/// A module carrying a resource is terminal: its own dependencies are not examined.
/// Otherwise each dependency target not yet in `visited` is marked and descended into.
/// Deduplication is by module id, two modules with the same path are both reported.
///
/// The walk keeps its own stack of `(module, next dependency index)` frames, so chain
/// length is bounded by heap rather than by the thread stack.
pub fn collect_resources(
    graph: &ModuleGraph,
    module: &Module,
    visited: &mut VisitedSet,
) -> Vec<String> {
    if let Some(resource) = &module.resource {
        trace!("Terminal module {}: {}", module.id, resource);
        return vec![resource.clone()];
    }

    let mut resources = Vec::new();
    let mut stack: Vec<(&Module, usize)> = vec![(module, 0)];

    while let Some(frame) = stack.last_mut() {
        let (current, next_dep) = *frame;
        let Some(dep) = current.dependencies.get(next_dep) else {
            stack.pop();
            continue;
        };
        frame.1 += 1;

        let Some(next_id) = dep.target() else {
            trace!("Skipping dependency of {} without a target module", current.id);
            continue;
        };

        if !visited.insert(next_id) {
            trace!("Already visited {}", next_id);
            continue;
        }

        match graph.get(next_id) {
            Some(next) => match &next.resource {
                Some(resource) => {
                    trace!("Terminal module {}: {}", next.id, resource);
                    resources.push(resource.clone());
                }
                None => stack.push((next, 0)),
            },
            None => trace!("Dependency {} of {} is not in the graph", next_id, current.id),
        }
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dependency;

    fn id(n: u64) -> ModuleId {
        ModuleId(n)
    }

    fn group(n: u64, deps: &[u64]) -> Module {
        Module::group(id(n), deps.iter().map(|d| Dependency::to(id(*d))).collect())
    }

    #[test]
    fn test_terminal_module_returns_own_resource() {
        let graph: ModuleGraph = vec![Module::terminal(id(1), "/a/x.scss")].into_iter().collect();
        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.scss"]);
    }

    #[test]
    fn test_terminal_module_ignores_its_dependencies() {
        let mut entry = Module::terminal(id(1), "/a/x.scss");
        entry.dependencies.push(Dependency::to(id(2)));
        let graph: ModuleGraph =
            vec![entry, Module::terminal(id(2), "/a/y.js")].into_iter().collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.scss"]);
    }

    #[test]
    fn test_depth_first_edge_order() {
        // 1 -> [2, 5], 2 -> [3, 4]
        let graph: ModuleGraph = vec![
            group(1, &[2, 5]),
            group(2, &[3, 4]),
            Module::terminal(id(3), "/a/one.css"),
            Module::terminal(id(4), "/a/two.css"),
            Module::terminal(id(5), "/a/three.css"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            collect_entry_resources(&graph, id(1)),
            vec!["/a/one.css", "/a/two.css", "/a/three.css"]
        );
    }

    #[test]
    fn test_circular_graph_terminates() {
        // 1 -> 2 -> 3 -> 2, 3 -> 4
        let graph: ModuleGraph = vec![
            group(1, &[2]),
            group(2, &[3]),
            group(3, &[2, 4]),
            Module::terminal(id(4), "/a/x.less"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.less"]);
    }

    #[test]
    fn test_cycle_back_to_entry() {
        // The entry is not pre-marked, so it is walked once more when reached again,
        // after which its children are already visited.
        let graph: ModuleGraph = vec![
            group(1, &[2, 3]),
            group(2, &[1]),
            Module::terminal(id(3), "/a/x.css"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.css"]);
    }

    #[test]
    fn test_shared_module_collected_once() {
        // Entry imports a and b, both import c
        let graph: ModuleGraph = vec![
            group(1, &[2, 3]),
            group(2, &[4]),
            group(3, &[4]),
            Module::terminal(id(4), "/a/shared.css"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/shared.css"]);
    }

    #[test]
    fn test_same_path_different_modules_not_deduplicated() {
        let graph: ModuleGraph = vec![
            group(1, &[2, 3]),
            Module::terminal(id(2), "/a/x.css"),
            Module::terminal(id(3), "/a/x.css"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.css", "/a/x.css"]);
    }

    #[test]
    fn test_origin_module_fallback() {
        let graph: ModuleGraph = vec![
            Module::group(id(1), vec![Dependency::from_origin(id(2))]),
            Module::terminal(id(2), "/a/origin.scss"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/origin.scss"]);
    }

    #[test]
    fn test_used_module_preferred_over_origin() {
        let dep = Dependency { module: Some(id(2)), origin_module: Some(id(3)) };
        let graph: ModuleGraph = vec![
            Module::group(id(1), vec![dep]),
            Module::terminal(id(2), "/a/used.css"),
            Module::terminal(id(3), "/a/origin.js"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/used.css"]);
    }

    #[test]
    fn test_dependency_without_target_is_skipped() {
        let graph: ModuleGraph = vec![
            Module::group(id(1), vec![Dependency::default(), Dependency::to(id(2))]),
            Module::terminal(id(2), "/a/x.css"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.css"]);
    }

    #[test]
    fn test_dangling_reference_is_skipped() {
        let graph: ModuleGraph =
            vec![group(1, &[9, 2]), Module::terminal(id(2), "/a/x.css")].into_iter().collect();

        assert_eq!(collect_entry_resources(&graph, id(1)), vec!["/a/x.css"]);
    }

    #[test]
    fn test_module_without_resource_or_dependencies() {
        let graph: ModuleGraph = vec![group(1, &[])].into_iter().collect();
        assert!(collect_entry_resources(&graph, id(1)).is_empty());
    }

    #[test]
    fn test_unknown_entry() {
        assert!(collect_entry_resources(&ModuleGraph::new(), id(1)).is_empty());
    }

    #[test]
    fn test_visited_set_not_shared_between_calls() {
        let graph: ModuleGraph =
            vec![group(1, &[2]), Module::terminal(id(2), "/a/x.css")].into_iter().collect();

        let first = collect_entry_resources(&graph, id(1));
        let second = collect_entry_resources(&graph, id(1));
        assert_eq!(first, second);
        assert_eq!(second, vec!["/a/x.css"]);
    }

    #[test]
    fn test_long_chain_on_small_stack() {
        // 1 -> 2 -> ... -> n, with n terminal
        const CHAIN: u64 = 100_000;
        let mut graph: ModuleGraph = (1..CHAIN).map(|n| group(n, &[n + 1])).collect();
        graph.add(Module::terminal(id(CHAIN), "/a/x.css"));

        let resources = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || collect_entry_resources(&graph, id(1)))
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(resources, vec!["/a/x.css"]);
    }
}
