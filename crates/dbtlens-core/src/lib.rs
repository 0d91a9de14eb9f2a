//! dbtlens Core
//!
//! Core domain model with stable, versioned types.
//! Report fields are part of the public output format - add, never rename.

pub mod config;
pub mod report;

pub use config::{Config, ConfigError, ReportConfig};
pub use report::{
    ImportantNode, ManifestStats, OverviewReport, ReportVersion, RunFailure, RunSummary, SlowNode,
};
