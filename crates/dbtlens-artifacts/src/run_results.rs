//! dbt run_results.json parsing
//!
//! Parses per-node outcome records from a dbt invocation, including the named
//! timing intervals used for performance summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome status of a single executed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
    Pass,
    Fail,
    Skipped,
}

impl RunStatus {
    /// Get the status as its run_results string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
        }
    }

    /// Whether this status represents a failed model build or test
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Fail)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named execution interval (compile, execute, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingInterval {
    /// Interval name
    pub name: String,

    /// Interval start
    pub started_at: DateTime<Utc>,

    /// Interval end
    pub completed_at: DateTime<Utc>,
}

/// Outcome record for a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique identifier of the executed node
    pub unique_id: String,

    /// Outcome status
    pub status: RunStatus,

    /// Message reported by the adapter, if any
    #[serde(default)]
    pub message: Option<String>,

    /// Compiled SQL, if captured
    #[serde(default)]
    pub compiled_code: Option<String>,

    /// Free-form adapter response map
    #[serde(default)]
    pub adapter_response: serde_json::Map<String, serde_json::Value>,

    /// Named execution intervals
    #[serde(default)]
    pub timing: Vec<TimingInterval>,
}

impl RunResult {
    /// Wall-clock duration in milliseconds across all timing intervals
    /// (earliest start to latest completion), or None without timing data.
    pub fn duration_ms(&self) -> Option<i64> {
        let started = self.timing.iter().map(|t| t.started_at).min()?;
        let completed = self.timing.iter().map(|t| t.completed_at).max()?;
        Some((completed - started).num_milliseconds())
    }
}

/// Invocation arguments recorded in run_results.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArgs {
    /// dbt project directory the run was invoked against
    #[serde(default)]
    pub project_dir: Option<String>,
}

/// dbt run_results.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResults {
    /// Per-node outcome records
    #[serde(default)]
    pub results: Vec<RunResult>,

    /// Invocation arguments
    #[serde(default)]
    pub args: RunArgs,
}
