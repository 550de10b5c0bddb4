//! In-memory Bamboo used by the stage tests

use async_trait::async_trait;
use jobreq_client::{BambooApi, ClientError, Result};
use jobreq_core::domain::RequirementSpec;
use jobreq_core::dto::job::{JobSearchResponse, JobSearchResult, SearchEntity};
use jobreq_core::dto::plan::{PlanEntry, PlanPage};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeBamboo {
    plans: Vec<String>,
    jobs: HashMap<String, Vec<(String, String)>>,
    overlapping_pages: bool,
    listing_status: Option<u16>,
    failing_searches: HashSet<String>,
    search_delays: HashMap<String, u64>,
    reported_job_totals: HashMap<String, usize>,
    rejected_jobs: HashMap<String, u16>,
    flaky_jobs: Mutex<HashMap<String, u32>>,
    applied: Mutex<HashSet<(String, String)>>,
    posts: Mutex<HashMap<String, usize>>,
    plan_requests: Mutex<Vec<(usize, usize)>>,
}

impl FakeBamboo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plans<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plans = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Register a plan's jobs; the plan is listed too if it is not already
    pub fn with_jobs<const N: usize>(mut self, plan_key: &str, jobs: [(&str, &str); N]) -> Self {
        if !self.plans.iter().any(|p| p == plan_key) {
            self.plans.push(plan_key.to_string());
        }
        self.jobs.insert(
            plan_key.to_string(),
            jobs.iter()
                .map(|(key, name)| (key.to_string(), name.to_string()))
                .collect(),
        );
        self
    }

    /// Every page after the first starts one plan early
    pub fn with_overlapping_pages(mut self) -> Self {
        self.overlapping_pages = true;
        self
    }

    pub fn failing_plan_listing(mut self, status: u16) -> Self {
        self.listing_status = Some(status);
        self
    }

    /// The job search for `plan_key` fails at the transport level
    pub fn failing_search(mut self, plan_key: &str) -> Self {
        self.failing_searches.insert(plan_key.to_string());
        self
    }

    pub fn with_search_delay(mut self, plan_key: &str, millis: u64) -> Self {
        self.search_delays.insert(plan_key.to_string(), millis);
        self
    }

    /// The job search for `plan_key` claims `size` results
    pub fn with_reported_job_total(mut self, plan_key: &str, size: usize) -> Self {
        self.reported_job_totals.insert(plan_key.to_string(), size);
        self
    }

    pub fn rejecting_job(mut self, job_key: &str, status: u16) -> Self {
        self.rejected_jobs.insert(job_key.to_string(), status);
        self
    }

    /// The first `failures` POSTs for `job_key` answer 503
    pub fn flaky_job(self, job_key: &str, failures: u32) -> Self {
        self.flaky_jobs
            .lock()
            .unwrap()
            .insert(job_key.to_string(), failures);
        self
    }

    pub fn requirement_posts(&self, job_key: &str) -> usize {
        self.posts.lock().unwrap().get(job_key).copied().unwrap_or(0)
    }

    pub fn plan_requests(&self) -> Vec<(usize, usize)> {
        self.plan_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BambooApi for FakeBamboo {
    async fn list_plans(&self, max_results: usize, start_index: usize) -> Result<PlanPage> {
        self.plan_requests
            .lock()
            .unwrap()
            .push((max_results, start_index));

        if let Some(status) = self.listing_status {
            return Err(ClientError::api_error(status, "listing refused"));
        }

        let start = if self.overlapping_pages && start_index > 0 {
            start_index - 1
        } else {
            start_index
        };

        let plan: Vec<PlanEntry> = self
            .plans
            .iter()
            .skip(start)
            .take(max_results)
            .map(|key| PlanEntry {
                key: key.clone(),
                name: None,
                short_name: None,
                enabled: Some(true),
            })
            .collect();

        Ok(PlanPage {
            size: Some(self.plans.len()),
            start_index: start,
            max_result: plan.len(),
            plan,
        })
    }

    async fn search_jobs(&self, plan_key: &str) -> Result<JobSearchResponse> {
        if let Some(millis) = self.search_delays.get(plan_key) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }

        if self.failing_searches.contains(plan_key) {
            return Err(ClientError::ConnectionFailed("connection reset".to_string()));
        }

        let jobs = self
            .jobs
            .get(plan_key)
            .ok_or_else(|| ClientError::api_error(404, "plan not found"))?;

        let search_results: Vec<JobSearchResult> = jobs
            .iter()
            .map(|(key, name)| JobSearchResult {
                id: Some(key.clone()),
                search_entity: SearchEntity {
                    key: key.clone(),
                    job_name: name.clone(),
                    plan_name: None,
                    project_name: None,
                },
            })
            .collect();

        Ok(JobSearchResponse {
            size: self
                .reported_job_totals
                .get(plan_key)
                .copied()
                .unwrap_or(search_results.len()),
            search_results,
        })
    }

    async fn add_requirement(&self, job_key: &str, requirement: &RequirementSpec) -> Result<()> {
        *self
            .posts
            .lock()
            .unwrap()
            .entry(job_key.to_string())
            .or_default() += 1;

        if let Some(status) = self.rejected_jobs.get(job_key) {
            return Err(ClientError::api_error(*status, "rejected"));
        }

        {
            let mut flaky = self.flaky_jobs.lock().unwrap();
            if let Some(remaining) = flaky.get_mut(job_key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(ClientError::api_error(503, "service unavailable"));
                }
            }
        }

        let inserted = self
            .applied
            .lock()
            .unwrap()
            .insert((job_key.to_string(), requirement.key.clone()));
        if !inserted {
            return Err(ClientError::api_error(400, "Requirement already exists"));
        }

        Ok(())
    }
}
