//! Manifest statistics
//!
//! Resource-type census, test coverage per table kind, and the criticality
//! ranking, folded into one ManifestStats record.

use crate::criticality::{build_important_nodes, rank_critical_nodes};
use dbtlens_artifacts::{GraphIndex, Manifest, ResourceType};
use dbtlens_core::ManifestStats;

const TEST_PREFIX: &str = "test.";

/// Compute aggregate statistics for a manifest.
///
/// The census covers nodes, sources, and unit tests; exposures participate
/// in lineage but are not counted here. Coverage counts nodes with at least
/// one direct child carrying the `test.` id prefix, bucketed by the node's
/// own id prefix.
pub fn compute_manifest_stats(manifest: &Manifest, graph: &GraphIndex) -> ManifestStats {
    let mut stats = ManifestStats::default();

    for node in manifest.all_nodes() {
        match node.resource_type {
            ResourceType::Model => stats.model_count += 1,
            ResourceType::Source => stats.sources_count += 1,
            ResourceType::Seed => stats.seeds_count += 1,
            ResourceType::Test => stats.test_count += 1,
            ResourceType::UnitTest => stats.unit_tests_count += 1,
            _ => {}
        }

        let tested = graph
            .children_of(&node.unique_id)
            .iter()
            .any(|child| child.starts_with(TEST_PREFIX));
        if tested {
            if node.unique_id.starts_with("model.") {
                stats.models_with_tests += 1;
            } else if node.unique_id.starts_with("source.") {
                stats.sources_with_tests += 1;
            } else if node.unique_id.starts_with("seed.") {
                stats.seeds_with_tests += 1;
            }
        }
    }

    let ranked = rank_critical_nodes(manifest, graph);
    stats.important_nodes = build_important_nodes(manifest, graph, &ranked);

    stats
}
