//! Job search DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobSummary;

/// Response of `GET /rest/api/latest/search/jobs/{planKey}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchResponse {
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub search_results: Vec<JobSearchResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchResult {
    #[serde(default)]
    pub id: Option<String>,
    pub search_entity: SearchEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntity {
    pub key: String,
    pub job_name: String,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl JobSearchResponse {
    /// Converts the search results into jobs owned by `plan_key`
    pub fn into_jobs(self, plan_key: &str) -> Vec<JobSummary> {
        self.search_results
            .into_iter()
            .map(|r| JobSummary::new(r.search_entity.key, r.search_entity.job_name, plan_key))
            .collect()
    }
}
