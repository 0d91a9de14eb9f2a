//! Run results summarization
//!
//! Status counts, failing results, and the slowest executed nodes.

use dbtlens_artifacts::{RunResults, RunStatus};
use dbtlens_core::{RunFailure, RunSummary, SlowNode};

/// How many slowest nodes the summary keeps
const SLOWEST_LIMIT: usize = 5;

/// Summarize a run_results.json document.
///
/// Slowest nodes are ranked by wall-clock duration across all timing
/// intervals; skipped results and results without timing data are left out.
pub fn summarize_run(run_results: &RunResults) -> RunSummary {
    let mut summary = RunSummary {
        total: run_results.results.len(),
        ..Default::default()
    };

    for result in &run_results.results {
        match result.status {
            RunStatus::Success => summary.succeeded += 1,
            RunStatus::Error => summary.errored += 1,
            RunStatus::Pass => summary.passed += 1,
            RunStatus::Fail => summary.failed += 1,
            RunStatus::Skipped => summary.skipped += 1,
        }

        if result.status.is_failure() {
            summary.failures.push(RunFailure {
                unique_id: result.unique_id.clone(),
                status: result.status.to_string(),
                message: result.message.clone(),
            });
        }
    }

    let mut timed: Vec<SlowNode> = run_results
        .results
        .iter()
        .filter(|result| result.status != RunStatus::Skipped)
        .filter_map(|result| {
            Some(SlowNode {
                unique_id: result.unique_id.clone(),
                status: result.status.to_string(),
                duration_ms: result.duration_ms()?,
            })
        })
        .collect();

    // stable sort: equal durations keep results order
    timed.sort_by(|a, b| b.duration_ms.cmp(&a.duration_ms));
    timed.truncate(SLOWEST_LIMIT);
    summary.slowest = timed;

    summary
}
