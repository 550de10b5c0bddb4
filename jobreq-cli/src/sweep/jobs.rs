//! Job resolution stage
//!
//! Searches the jobs of every plan concurrently and keeps those whose name
//! matches the filter. A plan that cannot be searched is recorded and
//! skipped; the other plans are still processed.

use jobreq_client::BambooApi;
use jobreq_core::domain::{ErrorKind, JobSummary, PlanFailure};
use jobreq_core::filter::NameFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cancel::CancelSignal;
use super::pool::run_bounded;

/// Output of the job resolution stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResolution {
    /// Jobs matching the name filter, in plan order
    pub jobs: Vec<JobSummary>,
    /// Jobs found before filtering
    pub found: usize,
    /// Plans whose jobs could not be fetched
    pub failures: Vec<PlanFailure>,
    pub cancelled: bool,
}

impl JobResolution {
    pub fn keys(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.key.clone()).collect()
    }
}

/// Resolve the matching jobs of `plan_keys`
pub async fn resolve_jobs(
    api: Arc<dyn BambooApi>,
    plan_keys: &[String],
    filter: &NameFilter,
    concurrency: usize,
    cancel: &CancelSignal,
) -> JobResolution {
    let slots = run_bounded(plan_keys.to_vec(), concurrency, cancel, move |plan_key| {
        let api = Arc::clone(&api);
        async move { search_plan(api.as_ref(), &plan_key).await }
    })
    .await;

    let mut resolution = JobResolution {
        cancelled: cancel.is_cancelled(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for (plan_key, slot) in plan_keys.iter().zip(slots) {
        match slot {
            Some(Ok(SearchResult { jobs, shortfall })) => {
                resolution.found += jobs.len();
                resolution.failures.extend(shortfall);
                for job in jobs {
                    if !filter.matches(&job.name) {
                        debug!("Skipping job {} ({}): name does not match", job.key, job.name);
                        continue;
                    }
                    if seen.insert(job.key.clone()) {
                        resolution.jobs.push(job);
                    }
                }
            }
            Some(Err(failure)) => resolution.failures.push(failure),
            None if resolution.cancelled => resolution.failures.push(PlanFailure {
                plan_key: plan_key.clone(),
                kind: ErrorKind::Cancelled,
                detail: "run cancelled before jobs were fetched".to_string(),
            }),
            None => resolution.failures.push(PlanFailure {
                plan_key: plan_key.clone(),
                kind: ErrorKind::Transport,
                detail: "job search task aborted".to_string(),
            }),
        }
    }

    info!(
        "Resolved {} matching job(s) out of {} across {} plan(s), {} plan failure(s)",
        resolution.jobs.len(),
        resolution.found,
        plan_keys.len(),
        resolution.failures.len()
    );

    resolution
}

/// Jobs of one plan, plus a failure when the server held some back
struct SearchResult {
    jobs: Vec<JobSummary>,
    shortfall: Option<PlanFailure>,
}

async fn search_plan(api: &dyn BambooApi, plan_key: &str) -> Result<SearchResult, PlanFailure> {
    match api.search_jobs(plan_key).await {
        Ok(response) => {
            let returned = response.search_results.len();
            if response.size > returned {
                warn!(
                    "Plan {} reports {} job(s) but returned {}",
                    plan_key, response.size, returned
                );
                return Ok(SearchResult {
                    shortfall: Some(PlanFailure {
                        plan_key: plan_key.to_string(),
                        kind: ErrorKind::Remote,
                        detail: format!("returned {} of {} job(s)", returned, response.size),
                    }),
                    jobs: response.into_jobs(plan_key),
                });
            }
            Ok(SearchResult {
                jobs: response.into_jobs(plan_key),
                shortfall: None,
            })
        }
        Err(e) => {
            warn!("Failed to fetch jobs for plan {}: {}", plan_key, e);
            Err(PlanFailure {
                plan_key: plan_key.to_string(),
                kind: e.kind(),
                detail: e.to_string(),
            })
        }
    }
}
