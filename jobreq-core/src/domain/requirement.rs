//! Requirement domain model

use serde::{Deserialize, Serialize};

/// Requirement key attached when nothing else is configured
pub const DEFAULT_REQUIREMENT_KEY: &str = "package_release";

/// Match type attached when nothing else is configured
pub const DEFAULT_MATCH_TYPE: &str = "EXISTS";

/// Agent capability requirement attached to every matched job
///
/// Serialises to the body the requirement endpoint expects, e.g.
/// `{"key":"package_release","matchType":"EXISTS"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSpec {
    pub key: String,
    pub match_type: String,
    /// Only meaningful for `EQUALS` / `MATCHES`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_value: Option<String>,
}

impl RequirementSpec {
    pub fn new(key: impl Into<String>, match_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            match_type: match_type.into(),
            match_value: None,
        }
    }

    pub fn with_match_value(mut self, value: impl Into<String>) -> Self {
        self.match_value = Some(value.into());
        self
    }
}

impl Default for RequirementSpec {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIREMENT_KEY, DEFAULT_MATCH_TYPE)
    }
}

impl std::fmt::Display for RequirementSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.match_value {
            Some(value) => write!(f, "{} {} {}", self.key, self.match_type, value),
            None => write!(f, "{} {}", self.key, self.match_type),
        }
    }
}
