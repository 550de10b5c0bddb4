//! Plan listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::plan::PlanSummary;

/// Response of `GET /rest/api/latest/plan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanListResponse {
    pub plans: PlanPage,
}

/// One page of the plan listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPage {
    /// Total number of plans on the server, when reported
    #[serde(default)]
    pub size: Option<usize>,

    #[serde(rename = "start-index")]
    pub start_index: usize,

    /// Number of plans this page was asked to hold
    #[serde(rename = "max-result")]
    pub max_result: usize,

    #[serde(default)]
    pub plan: Vec<PlanEntry>,
}

impl PlanPage {
    /// Whether the server reports plans beyond this page
    ///
    /// Without a total the only signal left is a page that came back full.
    pub fn has_more(&self) -> bool {
        match self.size {
            Some(total) => self.start_index.saturating_add(self.max_result) < total,
            None => !self.plan.is_empty() && self.plan.len() >= self.max_result,
        }
    }
}

/// A single plan in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl From<PlanEntry> for PlanSummary {
    fn from(entry: PlanEntry) -> Self {
        Self {
            key: entry.key,
            name: entry.name,
            short_name: entry.short_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let body = r#"{
            "expand": "plans",
            "plans": {
                "size": 2,
                "expand": "plan",
                "start-index": 0,
                "max-result": 2,
                "plan": [
                    {"key": "DVOPS-MAIN", "name": "DevOps - Main", "shortName": "Main", "enabled": true},
                    {"key": "CI-BUILD", "name": "CI - Build"}
                ]
            }
        }"#;

        let parsed: PlanListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.plans.plan.len(), 2);
        assert_eq!(parsed.plans.plan[0].key, "DVOPS-MAIN");
        assert_eq!(parsed.plans.plan[0].short_name.as_deref(), Some("Main"));
        assert!(!parsed.plans.has_more());

        let summary: PlanSummary = parsed.plans.plan[0].clone().into();
        assert_eq!(summary.key, "DVOPS-MAIN");
        assert_eq!(summary.name.as_deref(), Some("DevOps - Main"));
        assert_eq!(summary.short_name.as_deref(), Some("Main"));
    }

    #[test]
    fn test_has_more_huge_max_result() {
        let body = r#"{"plans": {"size": 5, "start-index": 1, "max-result": 18446744073709551615, "plan": [{"key": "A-B"}]}}"#;
        let parsed: PlanListResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.plans.has_more());

        let page = PlanPage {
            size: Some(usize::MAX),
            start_index: usize::MAX,
            max_result: usize::MAX,
            plan: Vec::new(),
        };
        assert!(!page.has_more());
    }

    #[test]
    fn test_missing_key_is_error() {
        let body = r#"{"plans": {"start-index": 0, "max-result": 1, "plan": [{"name": "x"}]}}"#;
        assert!(serde_json::from_str::<PlanListResponse>(body).is_err());
    }

    #[test]
    fn test_has_more_with_total() {
        let page = PlanPage {
            size: Some(5),
            start_index: 0,
            max_result: 2,
            plan: Vec::new(),
        };
        assert!(page.has_more());

        let last = PlanPage {
            size: Some(5),
            start_index: 4,
            max_result: 2,
            plan: Vec::new(),
        };
        assert!(!last.has_more());
    }

    #[test]
    fn test_has_more_without_total() {
        let full = PlanPage {
            size: None,
            start_index: 0,
            max_result: 1,
            plan: vec![PlanEntry {
                key: "A-B".to_string(),
                name: None,
                short_name: None,
                enabled: None,
            }],
        };
        assert!(full.has_more());

        let empty = PlanPage {
            size: None,
            start_index: 1,
            max_result: 1,
            plan: Vec::new(),
        };
        assert!(!empty.has_more());
    }
}
