//! Overview report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A node selected by the criticality ranking, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantNode {
    /// Unique identifier (e.g., "model.my_project.users")
    pub unique_id: String,

    /// Display name (falls back to the unique_id when the node has no name)
    pub name: String,

    /// Resource type (model, source, seed)
    pub resource_type: String,

    /// Materialization tag, if any
    pub materialized: Option<String>,

    /// Number of direct children that are data tests
    pub test_count: usize,

    /// Number of direct children that are unit tests
    pub unit_test_count: usize,
}

/// Aggregate statistics over a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStats {
    /// Number of models
    pub model_count: usize,

    /// Number of sources
    pub sources_count: usize,

    /// Number of seeds
    pub seeds_count: usize,

    /// Number of data tests
    pub test_count: usize,

    /// Number of unit tests
    pub unit_tests_count: usize,

    /// Models with at least one attached data test
    pub models_with_tests: usize,

    /// Sources with at least one attached data test
    pub sources_with_tests: usize,

    /// Seeds with at least one attached data test
    pub seeds_with_tests: usize,

    /// Criticality-ranked nodes, highest first
    pub important_nodes: Vec<ImportantNode>,
}

/// A failed result from run_results.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    /// Unique identifier of the failing node
    pub unique_id: String,

    /// Failure status (error or fail)
    pub status: String,

    /// Message reported by the adapter, if any
    pub message: Option<String>,
}

/// A node ranked by execution duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlowNode {
    /// Unique identifier of the executed node
    pub unique_id: String,

    /// Result status
    pub status: String,

    /// Wall-clock duration across all timing intervals, in milliseconds
    pub duration_ms: i64,
}

/// Summary of a run_results.json document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total number of results
    pub total: usize,

    /// Results with status "success"
    pub succeeded: usize,

    /// Results with status "error"
    pub errored: usize,

    /// Results with status "pass"
    pub passed: usize,

    /// Results with status "fail"
    pub failed: usize,

    /// Results with status "skipped"
    pub skipped: usize,

    /// Failing results (status error or fail)
    pub failures: Vec<RunFailure>,

    /// Slowest non-skipped nodes, longest first
    pub slowest: Vec<SlowNode>,
}

impl RunSummary {
    /// Check if the run had any errors or test failures
    pub fn has_failures(&self) -> bool {
        self.errored > 0 || self.failed > 0
    }
}

/// Overview report (report.json v1)
///
/// This is the stable output format.
/// All fields are versioned and backward-compatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub generated_at: String,

    /// Run identifier from manifest metadata
    pub invocation_id: String,

    /// Manifest statistics and criticality ranking
    pub stats: ManifestStats,

    /// Run results summary, when run_results.json was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSummary>,
}

impl OverviewReport {
    /// Create a report from computed manifest statistics
    pub fn new(invocation_id: impl Into<String>, stats: ManifestStats) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            generated_at: chrono::Utc::now().to_rfc3339(),
            invocation_id: invocation_id.into(),
            stats,
            run: None,
        }
    }

    /// Attach a run summary
    pub fn with_run(mut self, run: RunSummary) -> Self {
        self.run = Some(run);
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = OverviewReport::new("abc-123", ManifestStats::default());
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.stats.model_count, 0);
        assert!(report.run.is_none());
    }

    #[test]
    fn report_serialization() {
        let stats = ManifestStats {
            model_count: 2,
            important_nodes: vec![ImportantNode {
                unique_id: "model.proj.users".to_string(),
                name: "users".to_string(),
                resource_type: "model".to_string(),
                materialized: Some("table".to_string()),
                test_count: 1,
                unit_test_count: 0,
            }],
            ..Default::default()
        };

        let report = OverviewReport::new("abc-123", stats);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("model.proj.users"));
        // run is omitted entirely when absent
        assert!(!json.contains("\"run\""));
    }

    #[test]
    fn run_summary_failures() {
        let mut run = RunSummary::default();
        assert!(!run.has_failures());

        run.failed = 1;
        assert!(run.has_failures());
    }

    #[test]
    fn report_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overview.json");

        let report = OverviewReport::new("abc-123", ManifestStats::default());
        report.save_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: OverviewReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.invocation_id, "abc-123");
    }
}
