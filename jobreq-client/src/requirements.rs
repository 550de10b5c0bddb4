//! Job requirement API endpoints

use crate::BambooClient;
use crate::error::{ClientError, Result};
use jobreq_core::domain::RequirementSpec;
use tracing::debug;

impl BambooClient {
    /// Attach a requirement to a job
    ///
    /// The server answers 400 when the job already carries the requirement;
    /// that surfaces as an `ApiError` with status 400 and is left to the
    /// caller to classify.
    ///
    /// # Arguments
    /// * `job_key` - The job key (e.g. "DVOPS-MAIN-JOB1")
    /// * `requirement` - The requirement to attach
    pub async fn add_requirement(&self, job_key: &str, requirement: &RequirementSpec) -> Result<()> {
        if job_key.is_empty() {
            return Err(ClientError::InvalidRequest("job key is empty".to_string()));
        }

        let url = self.endpoint(&format!("/config/job/{}/requirement", job_key));
        debug!(%url, requirement = %requirement, "Adding requirement");

        let response = self
            .authorized(self.client.post(&url))
            .json(requirement)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
