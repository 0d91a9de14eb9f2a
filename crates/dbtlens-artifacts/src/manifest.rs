//! dbt manifest.json parsing
//!
//! Parses dbt-generated manifest.json into typed nodes, sources, exposures,
//! and unit tests, plus the precomputed child/parent adjacency maps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource kind of a manifest node (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Model,
    Test,
    Seed,
    Operation,
    Source,
    UnitTest,
    Exposure,
    Snapshot,
    SemanticModel,
    SavedQuery,
    Metric,
    Analysis,
}

impl ResourceType {
    /// Get the resource type as its manifest string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Test => "test",
            Self::Seed => "seed",
            Self::Operation => "operation",
            Self::Source => "source",
            Self::UnitTest => "unit_test",
            Self::Exposure => "exposure",
            Self::Snapshot => "snapshot",
            Self::SemanticModel => "semantic_model",
            Self::SavedQuery => "saved_query",
            Self::Metric => "metric",
            Self::Analysis => "analysis",
        }
    }

    /// Whether this kind represents a table-like resource (model, source, seed)
    pub fn is_table_like(&self) -> bool {
        matches!(self, Self::Model | Self::Source | Self::Seed)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Manifest metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// dbt project name
    pub project_name: String,

    /// Run identifier for the invocation that produced this manifest
    pub invocation_id: String,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// A node in the manifest (model, test, source, exposure, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Unique identifier (e.g., "model.my_project.users")
    pub unique_id: String,

    /// Resource type
    pub resource_type: ResourceType,

    /// Node name (e.g., "users")
    #[serde(default)]
    pub name: Option<String>,

    /// Alias (output table name), usually the same as `name`
    #[serde(default)]
    pub alias: Option<String>,

    /// Materialization tag (table, view, incremental, ...)
    #[serde(default)]
    pub materialized: Option<String>,

    /// Database name
    #[serde(default)]
    pub database: Option<String>,

    /// Schema name
    #[serde(default)]
    pub schema: Option<String>,

    /// Identifier override, used by source nodes only
    #[serde(default)]
    pub identifier: Option<String>,

    /// Original file path
    #[serde(default)]
    pub original_file_path: Option<String>,

    /// Package name
    #[serde(default)]
    pub package_name: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Dependencies
    #[serde(default)]
    pub depends_on: DependsOn,
}

impl ManifestNode {
    /// Display name, falling back to the unique_id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.unique_id)
    }
}

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest
    pub metadata: ManifestMetadata,

    /// Model, test, seed, snapshot, ... nodes
    #[serde(default)]
    pub nodes: HashMap<String, ManifestNode>,

    /// Source definitions
    #[serde(default)]
    pub sources: HashMap<String, ManifestNode>,

    /// Exposure definitions
    #[serde(default)]
    pub exposures: HashMap<String, ManifestNode>,

    /// Unit test definitions
    #[serde(default)]
    pub unit_tests: HashMap<String, ManifestNode>,

    /// Child map (node -> list of child nodes)
    #[serde(default)]
    pub child_map: HashMap<String, Vec<String>>,

    /// Parent map (node -> list of parent nodes)
    #[serde(default)]
    pub parent_map: HashMap<String, Vec<String>>,
}

impl Manifest {
    /// Resolve a node by unique_id across all node collections.
    ///
    /// Edges may reference ids outside the loaded set (cross-package
    /// references); callers skip unresolvable ids rather than erroring.
    pub fn node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes
            .get(unique_id)
            .or_else(|| self.sources.get(unique_id))
            .or_else(|| self.exposures.get(unique_id))
            .or_else(|| self.unit_tests.get(unique_id))
    }

    /// All census nodes: nodes, sources, and unit tests.
    ///
    /// Exposures are excluded here; they only participate in lineage.
    pub fn all_nodes(&self) -> impl Iterator<Item = &ManifestNode> {
        self.nodes
            .values()
            .chain(self.sources.values())
            .chain(self.unit_tests.values())
    }

    /// Unique ids of table-like nodes (model, source, seed), sorted.
    ///
    /// The sorted order is the deterministic iteration order the scoring
    /// engine relies on for tie-breaks.
    pub fn table_node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .all_nodes()
            .filter(|node| node.resource_type.is_table_like())
            .map(|node| node.unique_id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }
}
