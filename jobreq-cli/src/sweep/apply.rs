//! Requirement apply stage
//!
//! POSTs the requirement to every matched job. Each job gets its own outcome;
//! a failing job never stops the others. A 400 from this endpoint means the
//! job already carries the requirement.

use jobreq_client::{BambooApi, ClientError};
use jobreq_core::domain::{ApplyOutcome, ApplyStatus, ErrorKind, RequirementSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::cancel::CancelSignal;
use super::pool::run_bounded;

/// Backoff settings for transport failures and 5xx responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), doubling up to the cap
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

/// Settings for the apply stage
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            concurrency: 8,
            retry: RetryPolicy::default(),
        }
    }
}

/// Apply `requirement` to every job in `job_keys`
///
/// Returns one outcome per job key, in input order.
pub async fn apply_requirement(
    api: Arc<dyn BambooApi>,
    job_keys: &[String],
    requirement: &RequirementSpec,
    options: &ApplyOptions,
    cancel: &CancelSignal,
) -> Vec<ApplyOutcome> {
    if options.dry_run {
        info!(
            "Dry run: would apply requirement '{}' to {} job(s)",
            requirement,
            job_keys.len()
        );
        return job_keys
            .iter()
            .map(|key| ApplyOutcome::new(key, ApplyStatus::DryRun, "dry run, no request sent"))
            .collect();
    }

    let requirement = Arc::new(requirement.clone());
    let retry = options.retry;
    let slots = run_bounded(job_keys.to_vec(), options.concurrency, cancel, move |job_key| {
        let api = Arc::clone(&api);
        let requirement = Arc::clone(&requirement);
        async move { apply_one(api.as_ref(), &job_key, &requirement, retry).await }
    })
    .await;

    let outcomes: Vec<ApplyOutcome> = job_keys
        .iter()
        .zip(slots)
        .map(|(job_key, slot)| match slot {
            Some(outcome) => outcome,
            None if cancel.is_cancelled() => ApplyOutcome::new(
                job_key,
                ApplyStatus::Cancelled,
                "run cancelled before the requirement was applied",
            ),
            None => ApplyOutcome::new(
                job_key,
                ApplyStatus::Failed(ErrorKind::Transport),
                "apply task aborted",
            ),
        })
        .collect();

    let applied = outcomes
        .iter()
        .filter(|o| o.status == ApplyStatus::Applied)
        .count();
    let failed = outcomes.iter().filter(|o| !o.succeeded).count();
    info!(
        "Applied requirement to {} of {} job(s), {} failure(s)",
        applied,
        outcomes.len(),
        failed
    );

    outcomes
}

/// Apply the requirement to one job, retrying transient failures
async fn apply_one(
    api: &dyn BambooApi,
    job_key: &str,
    requirement: &RequirementSpec,
    retry: RetryPolicy,
) -> ApplyOutcome {
    let mut attempt = 0;

    loop {
        match api.add_requirement(job_key, requirement).await {
            Ok(()) => {
                debug!("Requirement '{}' added to {}", requirement, job_key);
                return ApplyOutcome::new(job_key, ApplyStatus::Applied, "requirement added");
            }
            Err(e) if e.is_retryable() && attempt < retry.max_retries => {
                attempt += 1;
                let delay = retry.delay_for(attempt);
                warn!(
                    "Applying requirement to {} failed (attempt {}/{}): {}; retrying in {:?}",
                    job_key,
                    attempt,
                    retry.max_retries.saturating_add(1),
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return classify(job_key, &e),
        }
    }
}

fn classify(job_key: &str, err: &ClientError) -> ApplyOutcome {
    if err.is_bad_request() {
        debug!("Job {} already satisfies the requirement", job_key);
        return ApplyOutcome::new(job_key, ApplyStatus::AlreadySatisfied, err.to_string());
    }

    warn!("Failed to apply requirement to {}: {}", job_key, err);
    ApplyOutcome::new(job_key, ApplyStatus::Failed(err.kind()), err.to_string())
}
