//! Plan domain model

use serde::{Deserialize, Serialize};

/// A build plan discovered on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Unique remote identifier (e.g. "DVOPS-MAIN")
    pub key: String,

    /// Display name, when the listing carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

impl PlanSummary {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            short_name: None,
        }
    }
}
