//! Cleanup run reporting
//!
//! Counters for what each kind's pipeline found and did. Residual
//! resources (abandoned or timed out) also show up in WARNING logs; the
//! report gives callers the same information programmatically.

use serde::Serialize;

use crate::driver::DeleteOutcome;

/// Counters for one kind's pipeline.
#[derive(Debug, Default, Clone, Serialize)]
pub struct KindReport {
    /// Qualified kind name, `service.resource`
    pub kind: String,
    /// Candidates discovered across all scopes
    pub found: usize,
    /// Candidates whose name says they are not ours
    pub filtered_out: usize,
    /// Deleted and confirmed gone
    pub deleted: usize,
    /// Already gone when we tried
    pub already_gone: usize,
    /// Given up after repeated failures
    pub abandoned: usize,
    /// Delete accepted but never confirmed
    pub timed_out: usize,
    /// Matched but skipped because of dry-run
    pub skipped: usize,
}

impl KindReport {
    /// Create an empty report for a kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Record one driver outcome.
    pub(crate) fn record(&mut self, outcome: DeleteOutcome) {
        match outcome {
            DeleteOutcome::Deleted => self.deleted += 1,
            DeleteOutcome::AlreadyGone => self.already_gone += 1,
            DeleteOutcome::Abandoned => self.abandoned += 1,
            DeleteOutcome::TimedOut => self.timed_out += 1,
        }
    }

    /// Fold a worker's counters into this report.
    pub(crate) fn merge(&mut self, other: &KindReport) {
        self.filtered_out += other.filtered_out;
        self.deleted += other.deleted;
        self.already_gone += other.already_gone;
        self.abandoned += other.abandoned;
        self.timed_out += other.timed_out;
        self.skipped += other.skipped;
    }

    /// Resources left behind by this kind's pipeline.
    pub fn residual(&self) -> usize {
        self.abandoned + self.timed_out
    }
}

/// Summary of a whole cleanup run, one entry per kind in execution order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CleanupReport {
    pub kinds: Vec<KindReport>,
}

impl CleanupReport {
    /// Look up one kind's counters by qualified name.
    pub fn kind(&self, name: &str) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == name)
    }

    /// Candidates discovered across all kinds.
    pub fn total_found(&self) -> usize {
        self.kinds.iter().map(|k| k.found).sum()
    }

    /// Resources deleted and confirmed across all kinds.
    pub fn total_deleted(&self) -> usize {
        self.kinds.iter().map(|k| k.deleted).sum()
    }

    /// Resources left behind across all kinds.
    pub fn total_residual(&self) -> usize {
        self.kinds.iter().map(|k| k.residual()).sum()
    }
}
