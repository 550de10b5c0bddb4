//! Job domain model

use serde::{Deserialize, Serialize};

/// A job found under a plan during this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Durable identifier used when applying the requirement
    pub key: String,
    /// Human-readable name used for filtering
    pub name: String,
    /// Key of the plan this job was found under
    pub plan_key: String,
}

impl JobSummary {
    pub fn new(key: impl Into<String>, name: impl Into<String>, plan_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            plan_key: plan_key.into(),
        }
    }
}
