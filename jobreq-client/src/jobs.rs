//! Job search API endpoints

use crate::BambooClient;
use crate::error::{ClientError, Result};
use jobreq_core::dto::job::JobSearchResponse;
use tracing::debug;

impl BambooClient {
    /// Search the jobs of a plan
    ///
    /// # Arguments
    /// * `plan_key` - The plan key (e.g. "DVOPS-MAIN")
    ///
    /// # Returns
    /// Every job the server reports under the plan
    pub async fn search_jobs(&self, plan_key: &str) -> Result<JobSearchResponse> {
        if plan_key.is_empty() {
            return Err(ClientError::InvalidRequest("plan key is empty".to_string()));
        }

        let url = self.endpoint(&format!("/search/jobs/{}", plan_key));
        debug!(%url, "Searching jobs");

        let response = self.authorized(self.client.get(&url)).send().await?;

        self.handle_response(response).await
    }
}
