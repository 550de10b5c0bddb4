//! Jobreq CLI
//!
//! Attaches an agent requirement to every Bamboo job that matches a naming
//! convention.
//!
//! A run:
//! - Loads credentials from a local `key=value` file
//! - Lists every plan, dropping excluded key prefixes
//! - Searches each plan's jobs and keeps those whose name matches
//! - POSTs the requirement to each kept job
//!
//! Progress goes to stderr through `tracing`; the report goes to stdout.

mod config;
mod credentials;
mod report;
mod sweep;

use anyhow::{Context, Result};
use clap::Parser;
use jobreq_client::{BambooApi, BambooClient};
use jobreq_core::domain::{DEFAULT_MATCH_TYPE, DEFAULT_REQUIREMENT_KEY, RequirementSpec};
use jobreq_core::filter::{NameFilter, PlanExclusion};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_BASE_URL};
use credentials::DEFAULT_CREDENTIALS_PATH;
use report::OutputFormat;
use sweep::plans::{DEFAULT_MAX_PAGES, Pagination};

#[derive(Parser)]
#[command(name = "jobreq")]
#[command(about = "Attach an agent requirement to matching Bamboo jobs", long_about = None)]
struct Cli {
    /// Bamboo base URL
    #[arg(long, env = "JOBREQ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Credential file with username=... and password=... lines
    #[arg(long, env = "JOBREQ_CREDENTIALS", default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Plans requested per listing call
    #[arg(long, default_value_t = 999)]
    page_size: usize,

    /// Read only the first listing page (plans beyond it are missed)
    #[arg(long)]
    single_page: bool,

    /// Maximum listing calls before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Skip plans whose key starts with this prefix (repeatable, default: CI-)
    #[arg(long = "exclude-prefix", value_name = "PREFIX")]
    exclude_prefixes: Vec<String>,

    /// Process every plan, ignoring exclusion prefixes
    #[arg(long, conflicts_with = "exclude_prefixes")]
    no_exclude: bool,

    /// Keep jobs whose name contains this text, ignoring case (repeatable, default: default, production)
    #[arg(long = "name-filter", value_name = "TEXT")]
    name_filters: Vec<String>,

    /// Requirement key to attach
    #[arg(long, default_value = DEFAULT_REQUIREMENT_KEY)]
    requirement_key: String,

    /// Requirement match type (EXISTS, EQUALS, MATCHES)
    #[arg(long, default_value = DEFAULT_MATCH_TYPE)]
    match_type: String,

    /// Requirement match value for EQUALS / MATCHES
    #[arg(long)]
    match_value: Option<String>,

    /// Discover plans and jobs but send no requirement
    #[arg(long)]
    dry_run: bool,

    /// Requests in flight at once
    #[arg(long, env = "JOBREQ_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retries for transport failures and 5xx when applying
    #[arg(long, default_value_t = 2)]
    retries: u32,

    /// Cancel the whole run after this many seconds
    #[arg(long)]
    run_timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

impl Cli {
    fn into_config(self) -> Config {
        let exclusion = if self.no_exclude {
            PlanExclusion::none()
        } else if self.exclude_prefixes.is_empty() {
            PlanExclusion::default()
        } else {
            PlanExclusion::new(self.exclude_prefixes)
        };

        let name_filter = if self.name_filters.is_empty() {
            NameFilter::default()
        } else {
            NameFilter::new(self.name_filters)
        };

        let mut requirement = RequirementSpec::new(self.requirement_key, self.match_type);
        if let Some(value) = self.match_value {
            requirement = requirement.with_match_value(value);
        }

        Config {
            base_url: self.base_url,
            credentials_path: self.credentials,
            page_size: self.page_size,
            pagination: if self.single_page {
                Pagination::SinglePage
            } else {
                Pagination::Full
            },
            max_pages: self.max_pages,
            exclusion,
            name_filter,
            requirement,
            dry_run: self.dry_run,
            concurrency: self.concurrency,
            request_timeout: Duration::from_secs(self.timeout),
            max_retries: self.retries,
            run_timeout: self.run_timeout.map(Duration::from_secs),
            output: self.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobreq=info,jobreq_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();
    config.validate()?;

    info!(
        "Starting sweep: base_url={}, requirement={}, dry_run={}",
        config.base_url, config.requirement, config.dry_run
    );

    let credentials = credentials::load(&config.credentials_path)
        .context("Failed to load credentials")?;

    let client = BambooClient::new(&config.base_url, credentials, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let api: Arc<dyn BambooApi> = Arc::new(client);

    let (cancel_handle, cancel) = sweep::cancel::channel();
    {
        let handle = cancel_handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling run");
                handle.cancel();
            }
        });
    }
    if let Some(limit) = config.run_timeout {
        let handle = cancel_handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            warn!("Run timeout of {:?} reached, cancelling run", limit);
            handle.cancel();
        });
    }

    let report = sweep::run(api, &config.sweep_settings(), &cancel).await?;

    match config.output {
        OutputFormat::Text => report::print_text(&report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
