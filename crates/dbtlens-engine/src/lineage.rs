//! Downstream reachability analysis
//!
//! Counts how many distinct nodes are reachable downstream of a given node,
//! and how many of those are exposures. One traversal is O(V+E); ranking
//! calls this once per table-like node, so a full ranking is O(V*(V+E)) -
//! fine for graphs up to tens of thousands of nodes.

use dbtlens_artifacts::{GraphIndex, Manifest, ResourceType};
use std::collections::HashSet;

/// Downstream reach of a single node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineageInfo {
    /// Distinct reachable nodes of relevant types, including the start node
    pub downstream_total: usize,

    /// Distinct reachable exposures
    pub downstream_exposures: usize,
}

/// Resource types that participate in lineage traversal
fn is_relevant(resource_type: ResourceType) -> bool {
    resource_type.is_table_like() || resource_type == ResourceType::Exposure
}

/// Compute the downstream reach of `start_id`.
///
/// Iterative stack-based traversal with a visited set, so diamonds and even
/// cycles terminate. The start node is marked visited when popped and counts
/// toward the total; a node with no children yields a total of 1. Children
/// that cannot be resolved in the manifest are skipped, never an error.
pub fn compute_lineage<'a>(
    manifest: &'a Manifest,
    graph: &'a GraphIndex,
    start_id: &'a str,
) -> LineageInfo {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut exposures: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = vec![start_id];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        for child_id in graph.children_of(current) {
            let Some(child) = manifest.node(child_id) else {
                continue;
            };

            if is_relevant(child.resource_type) {
                stack.push(&child.unique_id);
            }

            // exposures are recorded even before they are popped
            if child.resource_type == ResourceType::Exposure {
                exposures.insert(&child.unique_id);
            }
        }
    }

    LineageInfo {
        downstream_total: visited.len(),
        downstream_exposures: exposures.len(),
    }
}
