//! Plan-related API endpoints

use crate::BambooClient;
use crate::error::Result;
use jobreq_core::dto::plan::{PlanListResponse, PlanPage};
use tracing::debug;

impl BambooClient {
    /// Fetch one page of the plan listing
    ///
    /// # Arguments
    /// * `max_results` - Page size requested from the server
    /// * `start_index` - Zero-based offset of the first plan on the page
    ///
    /// # Returns
    /// The page, including the server's paging metadata
    pub async fn list_plans(&self, max_results: usize, start_index: usize) -> Result<PlanPage> {
        let url = self.endpoint("/plan");
        debug!(%url, max_results, start_index, "Fetching plan page");

        let response = self
            .authorized(self.client.get(&url))
            .query(&[
                ("max-results", max_results.to_string()),
                ("start-index", start_index.to_string()),
            ])
            .send()
            .await?;

        let listing: PlanListResponse = self.handle_response(response).await?;
        Ok(listing.plans)
    }
}
