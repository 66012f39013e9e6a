//! Export summary and reporting
//!
//! One [`BatchReport`] per batch kind attempted, plus a [`FailureRecord`] for
//! every failure, whether it hit a single batch or a whole organization.

use crate::domain::{BatchKind, CatalogError, FailureKind};
use std::path::PathBuf;
use std::time::Duration;

/// Exit code when every batch succeeded
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when at least one batch or organization failed
pub const EXIT_PARTIAL_FAILURE: i32 = 1;
/// Exit code when the run was stopped by a signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// What became of one batch kind for one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No records qualified; nothing was written
    Empty,
    /// Written and transferred; the local file was removed
    Transferred {
        /// Remote location of the file
        remote_path: String,
    },
    /// Written but the transfer failed; the local file was kept
    TransferFailed,
    /// Written and kept; transfer skipped
    DryRun,
    /// Nothing usable was produced
    Failed(FailureKind),
}

impl BatchOutcome {
    /// True for outcomes that count against the exit code
    pub fn is_failure(&self) -> bool {
        matches!(self, BatchOutcome::TransferFailed | BatchOutcome::Failed(_))
    }
}

/// One batch kind for one organization
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Organization name
    pub organization: String,
    /// Batch kind
    pub kind: BatchKind,
    /// Records written
    pub records: usize,
    /// Local file, if one was written and still matters
    pub file: Option<PathBuf>,
    /// SHA-256 of the written file
    pub sha256: Option<String>,
    /// Result
    pub outcome: BatchOutcome,
}

impl BatchReport {
    /// Report for a batch with no qualifying records
    pub fn empty(organization: &str, kind: BatchKind) -> Self {
        Self {
            organization: organization.to_string(),
            kind,
            records: 0,
            file: None,
            sha256: None,
            outcome: BatchOutcome::Empty,
        }
    }

    /// Report for a batch that failed before a file was kept
    pub fn failed(organization: &str, kind: BatchKind, failure: FailureKind) -> Self {
        Self {
            outcome: BatchOutcome::Failed(failure),
            ..Self::empty(organization, kind)
        }
    }
}

/// A failure with the context it happened in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Organization name
    pub organization: String,
    /// Batch kind, or `None` when the whole organization failed
    pub batch: Option<BatchKind>,
    /// Failure category
    pub failure: FailureKind,
    /// Error message
    pub message: String,
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Organizations attempted
    pub organizations: usize,
    /// Per-batch results, in processing order
    pub batches: Vec<BatchReport>,
    /// Every failure, in the order it happened
    pub failures: Vec<FailureRecord>,
    /// Run stopped early by a shutdown signal
    pub interrupted: bool,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a batch result
    pub fn add_batch(&mut self, report: BatchReport) {
        self.batches.push(report);
    }

    /// Record a failure
    pub fn add_failure(
        &mut self,
        organization: &str,
        batch: Option<BatchKind>,
        error: &CatalogError,
    ) {
        self.failures.push(FailureRecord {
            organization: organization.to_string(),
            batch,
            failure: error.category(),
            message: error.to_string(),
        });
    }

    /// Mark the run as interrupted
    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Total records written across all batches
    pub fn records_written(&self) -> usize {
        self.batches.iter().map(|b| b.records).sum()
    }

    /// Number of batches that transferred successfully
    pub fn transferred(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| matches!(b.outcome, BatchOutcome::Transferred { .. }))
            .count()
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && !self.batches.iter().any(|b| b.outcome.is_failure())
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.is_successful() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL_FAILURE
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            organizations = self.organizations,
            batches = self.batches.len(),
            records = self.records_written(),
            transferred = self.transferred(),
            failures = self.failures.len(),
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Export run completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                organization = %failure.organization,
                batch = failure.batch.map(|b| b.label()).unwrap_or("-"),
                failure = failure.failure.as_str(),
                error = %failure.message,
                "Export failure"
            );
        }
    }
}
