//! Per-item outcomes of the job resolution and apply stages

use serde::{Deserialize, Serialize};

use super::error::ErrorKind;

/// What happened when the requirement was applied to one job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "code", content = "kind")]
pub enum ApplyStatus {
    /// Server accepted the requirement (2xx)
    Applied,
    /// Requirement was already present (400 on this endpoint)
    AlreadySatisfied,
    /// Dry run, no request issued
    DryRun,
    /// Request failed
    Failed(ErrorKind),
    /// Run was cancelled before this job finished
    Cancelled,
}

impl ApplyStatus {
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            ApplyStatus::Applied | ApplyStatus::AlreadySatisfied | ApplyStatus::DryRun
        )
    }
}

impl std::fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyStatus::Applied => write!(f, "Applied"),
            ApplyStatus::AlreadySatisfied => write!(f, "AlreadySatisfied"),
            ApplyStatus::DryRun => write!(f, "DryRun"),
            ApplyStatus::Failed(kind) => write!(f, "Failed({})", kind),
            ApplyStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Result of applying the requirement to a single job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub job_key: String,
    pub succeeded: bool,
    pub status: ApplyStatus,
    pub detail: String,
}

impl ApplyOutcome {
    pub fn new(job_key: impl Into<String>, status: ApplyStatus, detail: impl Into<String>) -> Self {
        Self {
            job_key: job_key.into(),
            succeeded: status.succeeded(),
            status,
            detail: detail.into(),
        }
    }

    /// Error kind to report for this job, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.status {
            ApplyStatus::Failed(kind) => Some(kind),
            ApplyStatus::AlreadySatisfied => Some(ErrorKind::AlreadySatisfied),
            ApplyStatus::Cancelled => Some(ErrorKind::Cancelled),
            ApplyStatus::Applied | ApplyStatus::DryRun => None,
        }
    }
}

/// A plan whose jobs could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFailure {
    pub plan_key: String,
    pub kind: ErrorKind,
    pub detail: String,
}
