//! dbt artifact parsing and graph indexing
//!
//! This crate handles:
//! - Parsing manifest.json and run_results.json (dbt-generated artifacts)
//! - Building the adjacency index over the dependency graph
//! - Loading a target directory as one immutable artifact snapshot

pub mod graph;
pub mod manifest;
pub mod run_results;
pub mod target;

pub use graph::{GraphIndex, NodeId};
pub use manifest::{DependsOn, Manifest, ManifestMetadata, ManifestNode, ResourceType};
pub use run_results::{RunArgs, RunResult, RunResults, RunStatus, TimingInterval};
pub use target::{
    read_manifest, read_run_results, ArtifactError, TargetArtifacts, MANIFEST_FILE,
    RUN_RESULTS_FILE,
};
