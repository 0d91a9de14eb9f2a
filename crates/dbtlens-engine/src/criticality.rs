//! Composite criticality ranking
//!
//! Blends downstream reach and graph degree into one score per table-like
//! node, then selects an adaptive top-N. Exposures weigh more than internal
//! tables, and fan-out weighs more than fan-in.

use crate::lineage::{compute_lineage, LineageInfo};
use crate::percentile::percentile_ranks;
use dbtlens_artifacts::{GraphIndex, Manifest};
use dbtlens_core::ImportantNode;

/// Degree score weights: fan-out dominates fan-in
const OUT_DEGREE_WEIGHT: f64 = 0.8;
const IN_DEGREE_WEIGHT: f64 = 0.2;

/// A downstream exposure counts this many times an internal downstream node
const EXPOSURE_WEIGHT: f64 = 3.0;

/// Composite blend: lineage percentile dominates degree percentile
const LINEAGE_BLEND: f64 = 0.8;
const DEGREE_BLEND: f64 = 0.2;

/// Unique-id prefixes for attached test counting
const TEST_PREFIX: &str = "test.";
const UNIT_TEST_PREFIX: &str = "unit_test.";

/// In/out degree of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeDegree {
    /// Number of direct upstream dependencies
    pub in_degree: usize,

    /// Number of direct downstream dependents
    pub out_degree: usize,
}

/// Read a node's degree off the graph index
pub fn node_degree(graph: &GraphIndex, node_id: &str) -> NodeDegree {
    NodeDegree {
        in_degree: graph.parents_of(node_id).len(),
        out_degree: graph.children_of(node_id).len(),
    }
}

fn degree_raw_score(degree: NodeDegree) -> f64 {
    degree.out_degree as f64 * OUT_DEGREE_WEIGHT + degree.in_degree as f64 * IN_DEGREE_WEIGHT
}

fn lineage_raw_score(lineage: LineageInfo) -> f64 {
    let internal = lineage.downstream_total as f64 - lineage.downstream_exposures as f64;
    internal + lineage.downstream_exposures as f64 * EXPOSURE_WEIGHT
}

/// Adaptive top-N for a population of `table_count` table-like nodes:
/// a third of small graphs, a tenth of medium ones, a fixed 100 once large.
pub fn top_n_for(table_count: usize) -> usize {
    if table_count < 30 {
        table_count / 3
    } else if table_count < 1000 {
        table_count / 10
    } else {
        100
    }
}

/// Rank table-like nodes by composite criticality, highest first,
/// truncated to the adaptive top-N.
///
/// The population is iterated in sorted unique-id order and every sort is
/// stable, so equal composite scores break ties by unique_id and the result
/// is deterministic for a given manifest.
pub fn rank_critical_nodes(manifest: &Manifest, graph: &GraphIndex) -> Vec<String> {
    let table_ids = manifest.table_node_ids();

    let mut lineage_scores: Vec<(&str, f64)> = Vec::with_capacity(table_ids.len());
    let mut degree_scores: Vec<(&str, f64)> = Vec::with_capacity(table_ids.len());

    for &id in &table_ids {
        let lineage = compute_lineage(manifest, graph, id);
        lineage_scores.push((id, lineage_raw_score(lineage)));
        degree_scores.push((id, degree_raw_score(node_degree(graph, id))));
    }

    let lineage_pct = percentile_ranks(lineage_scores);
    let degree_pct = percentile_ranks(degree_scores);

    let mut composite: Vec<(&str, f64)> = table_ids
        .iter()
        .map(|&id| {
            let lp = lineage_pct.get(id).copied().unwrap_or(0.0);
            let dp = degree_pct.get(id).copied().unwrap_or(0.0);
            (id, lp * LINEAGE_BLEND + dp * DEGREE_BLEND)
        })
        .collect();

    composite.sort_by(|a, b| b.1.total_cmp(&a.1));

    composite
        .into_iter()
        .take(top_n_for(table_ids.len()))
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Materialize ranked ids into display records.
///
/// Ids that no longer resolve in the manifest are silently skipped. Test
/// counts scan direct children for the type prefix on their unique_id.
pub fn build_important_nodes(
    manifest: &Manifest,
    graph: &GraphIndex,
    ranked_ids: &[String],
) -> Vec<ImportantNode> {
    ranked_ids
        .iter()
        .filter_map(|id| {
            let node = manifest.node(id)?;
            let children = graph.children_of(&node.unique_id);

            Some(ImportantNode {
                unique_id: node.unique_id.clone(),
                name: node.display_name().to_string(),
                resource_type: node.resource_type.to_string(),
                materialized: node.materialized.clone(),
                test_count: children
                    .iter()
                    .filter(|c| c.starts_with(TEST_PREFIX))
                    .count(),
                unit_test_count: children
                    .iter()
                    .filter(|c| c.starts_with(UNIT_TEST_PREFIX))
                    .count(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_n_thresholds() {
        assert_eq!(top_n_for(0), 0);
        assert_eq!(top_n_for(2), 0);
        assert_eq!(top_n_for(29), 9);
        assert_eq!(top_n_for(30), 3);
        assert_eq!(top_n_for(40), 4);
        assert_eq!(top_n_for(999), 99);
        assert_eq!(top_n_for(1000), 100);
        assert_eq!(top_n_for(50_000), 100);
    }

    /// Linear chain of `n` models, model_0 -> model_1 -> ... -> model_{n-1}
    fn chain_manifest(n: usize) -> Manifest {
        let mut nodes = Vec::new();
        let mut child_map = Vec::new();
        let mut parent_map = Vec::new();

        for i in 0..n {
            let id = format!("model.p.m{:03}", i);
            nodes.push(format!(
                r#""{id}": {{"unique_id": "{id}", "resource_type": "model"}}"#
            ));
            if i + 1 < n {
                child_map.push(format!(r#""{id}": ["model.p.m{:03}"]"#, i + 1));
            }
            if i > 0 {
                parent_map.push(format!(r#""{id}": ["model.p.m{:03}"]"#, i - 1));
            }
        }

        let json = format!(
            r#"{{
                "metadata": {{"project_name": "p", "invocation_id": "i"}},
                "nodes": {{{}}},
                "child_map": {{{}}},
                "parent_map": {{{}}}
            }}"#,
            nodes.join(","),
            child_map.join(","),
            parent_map.join(","),
        );

        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn node_degree_reads_index() {
        let manifest = chain_manifest(3);
        let graph = GraphIndex::from_manifest(&manifest);

        let head = node_degree(&graph, "model.p.m000");
        assert_eq!(head.in_degree, 0);
        assert_eq!(head.out_degree, 1);

        let mid = node_degree(&graph, "model.p.m001");
        assert_eq!(mid.in_degree, 1);
        assert_eq!(mid.out_degree, 1);
    }

    #[test]
    fn chain_ranks_upstream_first() {
        // 40 tables => top_n = 4; the chain head reaches everything, so the
        // first four links of the chain are the four most critical
        let manifest = chain_manifest(40);
        let graph = GraphIndex::from_manifest(&manifest);

        let ranked = rank_critical_nodes(&manifest, &graph);
        assert_eq!(
            ranked,
            vec![
                "model.p.m000",
                "model.p.m001",
                "model.p.m002",
                "model.p.m003",
            ]
        );
    }

    #[test]
    fn empty_population_ranks_empty() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"metadata": {"project_name": "p", "invocation_id": "i"}, "nodes": {}}"#,
        )
        .unwrap();
        let graph = GraphIndex::from_manifest(&manifest);

        assert!(rank_critical_nodes(&manifest, &graph).is_empty());
    }

    #[test]
    fn exposures_outweigh_internal_downstream() {
        // hub feeds two dashboards; spine is a 5-model chain. Untripled, the
        // hub's downstream count (3) loses to the chain head (5); with
        // exposures counting triple its lineage raw score is 7 and it takes
        // first place. 6 tables => top_n = 2.
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "metadata": {"project_name": "p", "invocation_id": "i"},
                "nodes": {
                    "model.p.s1": {"unique_id": "model.p.s1", "resource_type": "model"},
                    "model.p.s2": {"unique_id": "model.p.s2", "resource_type": "model"},
                    "model.p.s3": {"unique_id": "model.p.s3", "resource_type": "model"},
                    "model.p.s4": {"unique_id": "model.p.s4", "resource_type": "model"},
                    "model.p.s5": {"unique_id": "model.p.s5", "resource_type": "model"},
                    "model.p.hub": {"unique_id": "model.p.hub", "resource_type": "model"}
                },
                "exposures": {
                    "exposure.p.dash": {"unique_id": "exposure.p.dash", "resource_type": "exposure"},
                    "exposure.p.report": {"unique_id": "exposure.p.report", "resource_type": "exposure"}
                },
                "child_map": {
                    "model.p.s1": ["model.p.s2"],
                    "model.p.s2": ["model.p.s3"],
                    "model.p.s3": ["model.p.s4"],
                    "model.p.s4": ["model.p.s5"],
                    "model.p.hub": ["exposure.p.dash", "exposure.p.report"]
                },
                "parent_map": {
                    "model.p.s2": ["model.p.s1"],
                    "model.p.s3": ["model.p.s2"],
                    "model.p.s4": ["model.p.s3"],
                    "model.p.s5": ["model.p.s4"]
                }
            }"#,
        )
        .unwrap();
        let graph = GraphIndex::from_manifest(&manifest);

        // lineage raw scores: s1=5, hub=1+2*3=7, s2=4 => hub outranks s1
        let ranked = rank_critical_nodes(&manifest, &graph);
        assert_eq!(ranked, vec!["model.p.hub", "model.p.s1"]);
    }

    #[test]
    fn ranking_is_deterministic() {
        let manifest = chain_manifest(40);
        let graph = GraphIndex::from_manifest(&manifest);

        let first = rank_critical_nodes(&manifest, &graph);
        let second = rank_critical_nodes(&manifest, &graph);
        assert_eq!(first, second);
    }

    #[test]
    fn materializer_counts_attached_tests() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "metadata": {"project_name": "p", "invocation_id": "i"},
                "nodes": {
                    "model.p.orders": {
                        "unique_id": "model.p.orders",
                        "resource_type": "model",
                        "name": "orders",
                        "materialized": "table"
                    },
                    "test.p.not_null": {"unique_id": "test.p.not_null", "resource_type": "test"},
                    "test.p.unique": {"unique_id": "test.p.unique", "resource_type": "test"}
                },
                "unit_tests": {
                    "unit_test.p.rollup": {"unique_id": "unit_test.p.rollup", "resource_type": "unit_test"}
                },
                "child_map": {
                    "model.p.orders": ["test.p.not_null", "test.p.unique", "unit_test.p.rollup"]
                }
            }"#,
        )
        .unwrap();
        let graph = GraphIndex::from_manifest(&manifest);

        let nodes = build_important_nodes(
            &manifest,
            &graph,
            &["model.p.orders".to_string(), "model.p.vanished".to_string()],
        );

        // the unresolvable id is skipped
        assert_eq!(nodes.len(), 1);
        let orders = &nodes[0];
        assert_eq!(orders.name, "orders");
        assert_eq!(orders.resource_type, "model");
        assert_eq!(orders.materialized.as_deref(), Some("table"));
        assert_eq!(orders.test_count, 2);
        assert_eq!(orders.unit_test_count, 1);
    }
}
