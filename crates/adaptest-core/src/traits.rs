//! Core trait definitions for examinees and progress reporting.
//!
//! The engine itself is synchronous; these traits sit at the seam where a
//! session driver waits on whoever answers the items.

use std::time::Duration;

use async_trait::async_trait;

use crate::model::ItemParameters;
use crate::simulation::SessionSummary;

// ---------------------------------------------------------------------------
// Examinee trait
// ---------------------------------------------------------------------------

/// Something that answers items.
#[async_trait]
pub trait Examinee: Send + Sync {
    /// Label used in logs and reports.
    fn name(&self) -> &str;

    /// The examinee's true ability, when known (simulations only).
    fn true_theta(&self) -> Option<f64> {
        None
    }

    /// Answer one item; `true` for correct.
    async fn answer(&self, item: &ItemParameters) -> anyhow::Result<bool>;
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_session_start(&self, examinee: &str);
    fn on_session_complete(&self, summary: &SessionSummary);
    fn on_session_error(&self, examinee: &str, error: &str);
    fn on_run_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_session_start(&self, _: &str) {}
    fn on_session_complete(&self, _: &SessionSummary) {}
    fn on_session_error(&self, _: &str, _: &str) {}
    fn on_run_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}
