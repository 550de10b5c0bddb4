//! Sweep report
//!
//! Collects the output of every stage and renders it either as coloured text
//! or as a single JSON document.

use clap::ValueEnum;
use colored::*;
use jobreq_core::domain::{ApplyOutcome, ApplyStatus, ErrorKind, RequirementSpec};
use serde::Serialize;

use crate::sweep::jobs::JobResolution;
use crate::sweep::plans::PlanList;

/// How the final report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything one run discovered and did
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub requirement: RequirementSpec,
    pub dry_run: bool,
    pub plans: PlanList,
    pub jobs: JobResolution,
    pub outcomes: Vec<ApplyOutcome>,
    pub cancelled: bool,
}

/// Headline counts of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub plans_seen: usize,
    pub plans_excluded: usize,
    pub jobs_found: usize,
    pub jobs_matched: usize,
    pub applied: usize,
    pub already_satisfied: usize,
    pub dry_run: usize,
    pub plan_failures: usize,
    pub job_failures: usize,
}

impl SweepReport {
    pub fn new(requirement: RequirementSpec, dry_run: bool) -> Self {
        Self {
            requirement,
            dry_run,
            plans: PlanList::default(),
            jobs: JobResolution::default(),
            outcomes: Vec::new(),
            cancelled: false,
        }
    }

    pub fn totals(&self) -> Totals {
        let count = |status: ApplyStatus| self.outcomes.iter().filter(|o| o.status == status).count();

        Totals {
            plans_seen: self.plans.seen(),
            plans_excluded: self.plans.excluded.len(),
            jobs_found: self.jobs.found,
            jobs_matched: self.jobs.jobs.len(),
            applied: count(ApplyStatus::Applied),
            already_satisfied: count(ApplyStatus::AlreadySatisfied),
            dry_run: count(ApplyStatus::DryRun),
            plan_failures: self.jobs.failures.len(),
            job_failures: self.failed_jobs().count(),
        }
    }

    /// Jobs whose outcome was not a success
    pub fn failed_jobs(&self) -> impl Iterator<Item = &ApplyOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded)
    }

    /// True when nothing failed, nothing was missed and the run was not cancelled
    ///
    /// Jobs that already carried the requirement count as successes. A
    /// truncated `--single-page` listing does not fail the run.
    pub fn is_success(&self) -> bool {
        !self.cancelled
            && !self.plans.is_incomplete()
            && self.jobs.failures.is_empty()
            && self.failed_jobs().next().is_none()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            #[serde(flatten)]
            report: &'a SweepReport,
            totals: Totals,
            success: bool,
        }

        serde_json::to_string_pretty(&Document {
            report: self,
            totals: self.totals(),
            success: self.is_success(),
        })
    }
}

/// Print the report as human-readable text
pub fn print_text(report: &SweepReport) {
    let totals = report.totals();

    println!("{}", "Plans:".bold());
    println!(
        "  size: {} ({} excluded)",
        report.plans.plans.len(),
        totals.plans_excluded
    );
    for plan in &report.plans.plans {
        println!("  {} {}", "▸".cyan(), plan.key);
    }
    if report.plans.truncated {
        println!(
            "  {}",
            "⚠ Plan listing was truncated; some plans were not processed".yellow()
        );
    }
    println!();

    println!("{}", "Jobs:".bold());
    println!(
        "  size: {} (of {} found)",
        totals.jobs_matched, totals.jobs_found
    );
    for job in &report.jobs.jobs {
        println!("  {} {} {}", "▸".cyan(), job.key, format!("({})", job.name).dimmed());
    }
    for failure in &report.jobs.failures {
        println!(
            "  {} {} [{}] {}",
            "✗".red(),
            failure.plan_key,
            failure.kind.to_string().red(),
            failure.detail.dimmed()
        );
    }
    println!();

    if !report.outcomes.is_empty() {
        println!("{}", format!("Requirement {}:", report.requirement).bold());
        for outcome in &report.outcomes {
            print_outcome(outcome);
        }
        println!();
    }

    print_summary(report, &totals);
}

fn print_outcome(outcome: &ApplyOutcome) {
    let marker = match outcome.status {
        ApplyStatus::Applied => "✓".green(),
        ApplyStatus::AlreadySatisfied => "=".cyan(),
        ApplyStatus::DryRun => "~".dimmed(),
        ApplyStatus::Failed(_) => "✗".red(),
        ApplyStatus::Cancelled => "-".yellow(),
    };

    println!(
        "  {} {} {}",
        marker,
        outcome.job_key,
        colorize_status(&outcome.status)
    );
}

fn print_summary(report: &SweepReport, totals: &Totals) {
    println!("{}", "Summary:".bold());
    println!("  Plans seen:        {}", totals.plans_seen);
    println!("  Jobs matched:      {}", totals.jobs_matched);
    if report.dry_run {
        println!("  Would apply:       {}", totals.dry_run);
    } else {
        println!("  Applied:           {}", totals.applied);
        println!("  Already satisfied: {}", totals.already_satisfied);
    }
    println!("  Plan failures:     {}", totals.plan_failures);
    println!("  Job failures:      {}", totals.job_failures);

    let failed: Vec<_> = report.failed_jobs().collect();
    if !failed.is_empty() {
        println!("\n{}", "Failed jobs:".bold());
        for outcome in failed {
            let kind = outcome.error_kind().unwrap_or(ErrorKind::Remote);
            println!(
                "  {} [{}] {}",
                outcome.job_key,
                kind.to_string().red(),
                outcome.detail
            );
        }
    }

    if report.cancelled {
        println!("\n{}", "Run cancelled; results are partial.".yellow());
    }
}

/// Colorize an apply status for display
fn colorize_status(status: &ApplyStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        ApplyStatus::Applied => status_str.green(),
        ApplyStatus::AlreadySatisfied => status_str.cyan(),
        ApplyStatus::DryRun => status_str.dimmed(),
        ApplyStatus::Failed(_) => status_str.red(),
        ApplyStatus::Cancelled => status_str.yellow(),
    }
}
