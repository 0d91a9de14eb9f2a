//! Dependency graph index
//!
//! Builds forward and reverse adjacency over the manifest's dependency graph.
//! Edges may point at ids absent from the node set; the index stores them
//! as-is and consumers skip what they cannot resolve.

use crate::manifest::Manifest;
use std::collections::{HashMap, HashSet, VecDeque};

/// Node identifier (unique_id from manifest)
pub type NodeId = String;

/// Adjacency index with child and parent edges
#[derive(Debug, Clone)]
pub struct GraphIndex {
    /// node -> list of nodes that depend on it (children)
    children: HashMap<NodeId, Vec<NodeId>>,

    /// node -> list of nodes it depends on (parents)
    parents: HashMap<NodeId, Vec<NodeId>>,
}

impl GraphIndex {
    /// Build the index from a manifest.
    ///
    /// Uses the precomputed child_map/parent_map when the manifest carries
    /// them, otherwise inverts the per-node depends_on edges. Inverted
    /// adjacency lists are sorted so the index is deterministic either way.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        if !manifest.child_map.is_empty() || !manifest.parent_map.is_empty() {
            return Self {
                children: manifest.child_map.clone(),
                parents: manifest.parent_map.clone(),
            };
        }

        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut parents: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        let all = manifest
            .nodes
            .values()
            .chain(manifest.sources.values())
            .chain(manifest.exposures.values())
            .chain(manifest.unit_tests.values());

        for node in all {
            let deps = &node.depends_on.nodes;
            if deps.is_empty() {
                continue;
            }

            parents.insert(node.unique_id.clone(), deps.clone());
            for dep_id in deps {
                children
                    .entry(dep_id.clone())
                    .or_default()
                    .push(node.unique_id.clone());
            }
        }

        for list in children.values_mut() {
            list.sort_unstable();
        }
        for list in parents.values_mut() {
            list.sort_unstable();
        }

        Self { children, parents }
    }

    /// Direct children (dependents) of a node, empty for unknown ids
    pub fn children_of(&self, node_id: &str) -> &[NodeId] {
        self.children.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct parents (dependencies) of a node, empty for unknown ids
    pub fn parents_of(&self, node_id: &str) -> &[NodeId] {
        self.parents.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All downstream nodes (transitive closure of children), excluding the
    /// start node, in BFS discovery order.
    pub fn downstream(&self, node_id: &str) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<NodeId> = self.children_of(node_id).iter().cloned().collect();
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            for child in self.children_of(&current) {
                if !visited.contains(child) {
                    queue.push_back(child.clone());
                }
            }

            result.push(current);
        }

        result
    }
}
