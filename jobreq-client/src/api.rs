//! Injectable API seam
//!
//! The sweep stages only depend on this trait, so tests can swap the real
//! HTTP client for an in-memory server.

use async_trait::async_trait;
use jobreq_core::domain::RequirementSpec;
use jobreq_core::dto::job::JobSearchResponse;
use jobreq_core::dto::plan::PlanPage;

use crate::BambooClient;
use crate::error::Result;

/// Operations a requirement sweep issues against the server
#[async_trait]
pub trait BambooApi: Send + Sync {
    /// Fetch one page of the plan listing
    async fn list_plans(&self, max_results: usize, start_index: usize) -> Result<PlanPage>;

    /// Search the jobs of one plan
    async fn search_jobs(&self, plan_key: &str) -> Result<JobSearchResponse>;

    /// Attach a requirement to one job
    async fn add_requirement(&self, job_key: &str, requirement: &RequirementSpec) -> Result<()>;
}

#[async_trait]
impl BambooApi for BambooClient {
    async fn list_plans(&self, max_results: usize, start_index: usize) -> Result<PlanPage> {
        BambooClient::list_plans(self, max_results, start_index).await
    }

    async fn search_jobs(&self, plan_key: &str) -> Result<JobSearchResponse> {
        BambooClient::search_jobs(self, plan_key).await
    }

    async fn add_requirement(&self, job_key: &str, requirement: &RequirementSpec) -> Result<()> {
        BambooClient::add_requirement(self, job_key, requirement).await
    }
}
