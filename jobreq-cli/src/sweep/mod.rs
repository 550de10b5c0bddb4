//! Requirement sweep
//!
//! Runs the three remote stages in order: list plans, resolve their jobs,
//! apply the requirement. Each stage fully materialises its output before the
//! next one starts; fan-out only happens inside a stage.

pub mod apply;
pub mod cancel;
pub mod jobs;
pub mod plans;
mod pool;

#[cfg(test)]
mod fake;

use anyhow::{Context, Result};
use jobreq_client::BambooApi;
use jobreq_core::domain::RequirementSpec;
use jobreq_core::filter::NameFilter;
use std::sync::Arc;
use tracing::{info, warn};

use crate::report::SweepReport;
use apply::ApplyOptions;
use cancel::CancelSignal;
use plans::PlanListing;

/// Everything a sweep needs besides the API and the cancel signal
#[derive(Debug, Clone, Default)]
pub struct SweepSettings {
    pub listing: PlanListing,
    pub name_filter: NameFilter,
    pub requirement: RequirementSpec,
    pub apply: ApplyOptions,
}

/// Run a full sweep
///
/// # Errors
/// Returns an error only when the plan listing fails. Per-plan and per-job
/// failures are recorded in the report instead.
pub async fn run(
    api: Arc<dyn BambooApi>,
    settings: &SweepSettings,
    cancel: &CancelSignal,
) -> Result<SweepReport> {
    let mut report = SweepReport::new(settings.requirement.clone(), settings.apply.dry_run);

    info!("Listing plans");
    let listed = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        listed = plans::list_plans(api.as_ref(), &settings.listing) => {
            Some(listed.context("Failed to list plans")?)
        }
    };
    let Some(listed) = listed else {
        warn!("Run cancelled while listing plans");
        report.cancelled = true;
        return Ok(report);
    };
    let plan_keys = listed.keys();
    report.plans = listed;

    info!("Resolving jobs for {} plan(s)", plan_keys.len());
    report.jobs = jobs::resolve_jobs(
        Arc::clone(&api),
        &plan_keys,
        &settings.name_filter,
        settings.apply.concurrency,
        cancel,
    )
    .await;
    if report.jobs.cancelled {
        warn!("Run cancelled while resolving jobs");
        report.cancelled = true;
        return Ok(report);
    }

    let job_keys = report.jobs.keys();
    info!("Applying requirement '{}' to {} job(s)", settings.requirement, job_keys.len());
    report.outcomes = apply::apply_requirement(
        api,
        &job_keys,
        &settings.requirement,
        &settings.apply,
        cancel,
    )
    .await;
    report.cancelled = cancel.is_cancelled();

    Ok(report)
}
