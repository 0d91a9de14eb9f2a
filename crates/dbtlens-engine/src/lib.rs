//! dbtlens engine - Manifest statistics and criticality scoring
//!
//! This crate implements the analysis over parsed artifacts:
//! - Downstream reachability (lineage) analysis
//! - Percentile rank normalization
//! - Composite criticality ranking with adaptive top-N selection
//! - Manifest statistics and run results summarization
//!
//! The engine does no I/O: every function is a pure computation over one
//! immutable artifact snapshot.

pub mod criticality;
pub mod lineage;
pub mod percentile;
pub mod run_summary;
pub mod stats;

pub use criticality::{
    build_important_nodes, node_degree, rank_critical_nodes, top_n_for, NodeDegree,
};
pub use lineage::{compute_lineage, LineageInfo};
pub use percentile::percentile_ranks;
pub use run_summary::summarize_run;
pub use stats::compute_manifest_stats;
