//! Filtering predicates
//!
//! Two naming conventions decide what a sweep touches: plans whose key starts
//! with an excluded prefix are dropped at listing time, and only jobs whose
//! name contains one of the configured words are kept.

use serde::{Deserialize, Serialize};

/// Plan key prefixes excluded by default
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["CI-"];

/// Job name words matched by default
pub const DEFAULT_NAME_PATTERNS: &[&str] = &["default", "production"];

/// Drops plans whose key begins with any of the configured prefixes
///
/// Prefix matching is case-sensitive, as plan keys are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExclusion {
    prefixes: Vec<String>,
}

impl PlanExclusion {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Exclusion that keeps every plan
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    pub fn is_excluded(&self, plan_key: &str) -> bool {
        self.prefixes.iter().any(|p| plan_key.starts_with(p.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for PlanExclusion {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PREFIXES.iter().copied())
    }
}

/// Keeps jobs whose name contains any configured pattern, ignoring case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    patterns: Vec<String>,
}

impl NameFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| Into::<String>::into(p).to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, job_name: &str) -> bool {
        let name = job_name.to_lowercase();
        self.patterns.iter().any(|p| name.contains(p.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PATTERNS.iter().copied())
    }
}
