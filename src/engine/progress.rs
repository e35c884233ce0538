//! Weighted progress aggregation
//!
//! Overall percent is derived from the fixed stage count:
//! `stage_index/total*100 + (local/100)*(100/total)`. No stage needs to
//! know the others' weights, and the per-run tracker clamps reports so
//! later calls never show a lower percent than earlier ones.

use super::stages::StageKind;

/// One progress report from a run
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Overall percent in `0.0..=100.0`, non-decreasing per run
    pub percent: f64,
    pub stage: StageKind,
    pub detail: String,
}

/// Observer for progress reports.
///
/// Delivery is one-way and fire-and-forget from the engine worker; any
/// thread-affinity marshaling is the receiver's concern.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: &ProgressUpdate) {
        self(update);
    }
}

/// Per-run aggregator enforcing the monotonic-ordering guarantee
pub(crate) struct ProgressTracker<'a> {
    sink: Option<&'a dyn ProgressSink>,
    total_stages: usize,
    last_percent: f64,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: Option<&'a dyn ProgressSink>, total_stages: usize) -> Self {
        Self {
            sink,
            total_stages,
            last_percent: 0.0,
        }
    }

    pub(crate) fn report(
        &mut self,
        stage_index: usize,
        stage: StageKind,
        local_percent: f64,
        detail: &str,
    ) {
        let share = 100.0 / self.total_stages as f64;
        let overall = stage_index as f64 * share + (local_percent / 100.0) * share;
        let overall = overall.clamp(0.0, 100.0).max(self.last_percent);
        self.last_percent = overall;

        if let Some(sink) = self.sink {
            sink.report(&ProgressUpdate {
                percent: overall,
                stage,
                detail: detail.to_string(),
            });
        }
    }

    pub(crate) fn last_percent(&self) -> f64 {
        self.last_percent
    }
}
