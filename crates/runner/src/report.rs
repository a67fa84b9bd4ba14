//! Per-target outcomes and the run summary.

use std::fmt;

use sitediff_compare::DiffResult;

/// Outcome of one page target.
#[derive(Debug, Clone)]
pub enum TargetStatus {
    /// Diff completed; divergence recorded.
    Diffed(DiffResult),
    /// A capture failed; the diff was skipped.
    CaptureFailed(String),
    /// Captures succeeded but the diff pair failed.
    DiffFailed(String),
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diffed(result) => write!(
                f,
                "{} differing pixels (error rate {:.4}) -> {}",
                result.diff_pixel_count,
                result.error_rate,
                result.diff_image_path.display()
            ),
            Self::CaptureFailed(e) => write!(f, "capture failed: {e}"),
            Self::DiffFailed(e) => write!(f, "diff failed: {e}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    pub status: TargetStatus,
}

impl TargetReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.status, TargetStatus::Diffed(_))
    }
}

/// Aggregate outcome of a run, one entry per target in input order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    pub fn push(&mut self, name: impl Into<String>, status: TargetStatus) {
        self.targets.push(TargetReport {
            name: name.into(),
            status,
        });
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.targets.iter().all(TargetReport::succeeded)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.succeeded()).count()
    }
}
