//! Configuration module
//!
//! Every operational parameter of a sweep: where the server is, how to page
//! through it, which plans and jobs to touch, and what to attach to them.

use jobreq_core::domain::RequirementSpec;
use jobreq_core::filter::{NameFilter, PlanExclusion};
use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::DEFAULT_CREDENTIALS_PATH;
use crate::report::OutputFormat;
use crate::sweep::SweepSettings;
use crate::sweep::apply::{ApplyOptions, RetryPolicy};
use crate::sweep::plans::{DEFAULT_MAX_PAGES, Pagination, PlanListing};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8085/bamboo";

/// Sweep configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server base URL, without the `/rest/api` suffix
    pub base_url: String,

    /// Path of the `key=value` credential file
    pub credentials_path: PathBuf,

    /// Plans requested per listing call
    pub page_size: usize,

    pub pagination: Pagination,

    /// Upper bound on listing calls
    pub max_pages: usize,

    pub exclusion: PlanExclusion,

    pub name_filter: NameFilter,

    pub requirement: RequirementSpec,

    /// List and resolve, but send no POST
    pub dry_run: bool,

    /// Requests in flight at once, per stage
    pub concurrency: usize,

    /// Upper bound for each HTTP request
    pub request_timeout: Duration,

    /// Extra attempts for transport failures and 5xx on apply
    pub max_retries: u32,

    /// Cancel the whole run after this long
    pub run_timeout: Option<Duration>,

    pub output: OutputFormat,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than 0");
        }

        if self.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.run_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("run_timeout must be greater than 0");
        }

        if self.requirement.key.trim().is_empty() {
            anyhow::bail!("requirement key cannot be empty");
        }

        if self.requirement.match_type.trim().is_empty() {
            anyhow::bail!("requirement match type cannot be empty");
        }

        if self.name_filter.is_empty() {
            anyhow::bail!("name filter needs at least one pattern");
        }

        Ok(())
    }

    /// Settings handed to the sweep driver
    pub fn sweep_settings(&self) -> SweepSettings {
        SweepSettings {
            listing: PlanListing {
                page_size: self.page_size,
                pagination: self.pagination,
                max_pages: self.max_pages,
                exclusion: self.exclusion.clone(),
            },
            name_filter: self.name_filter.clone(),
            requirement: self.requirement.clone(),
            apply: ApplyOptions {
                dry_run: self.dry_run,
                concurrency: self.concurrency,
                retry: RetryPolicy {
                    max_retries: self.max_retries,
                    ..Default::default()
                },
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            page_size: 999,
            pagination: Pagination::Full,
            max_pages: DEFAULT_MAX_PAGES,
            exclusion: PlanExclusion::default(),
            name_filter: NameFilter::default(),
            requirement: RequirementSpec::default(),
            dry_run: false,
            concurrency: 8,
            request_timeout: Duration::from_secs(30),
            max_retries: 2,
            run_timeout: None,
            output: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.page_size, 999);
        assert_eq!(config.pagination, Pagination::Full);
        assert_eq!(config.requirement, RequirementSpec::new("package_release", "EXISTS"));
        assert!(config.exclusion.is_excluded("CI-BUILD"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.base_url = "bamboo.example.com".to_string();
        assert!(config.validate().is_err());
        config.base_url = "https://bamboo.example.com/bamboo".to_string();
        assert!(config.validate().is_ok());

        config.page_size = 0;
        assert!(config.validate().is_err());
        config.page_size = 50;

        config.concurrency = 0;
        assert!(config.validate().is_err());
        config.concurrency = 1;

        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.request_timeout = Duration::from_secs(1);

        config.run_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());
        config.run_timeout = None;

        config.requirement.key = " ".to_string();
        assert!(config.validate().is_err());
        config.requirement.key = "package_release".to_string();

        config.name_filter = NameFilter::new(Vec::<String>::new());
        assert!(config.validate().is_err());
        config.name_filter = NameFilter::default();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sweep_settings() {
        let config = Config {
            page_size: 25,
            pagination: Pagination::SinglePage,
            dry_run: true,
            concurrency: 3,
            max_retries: 0,
            ..Default::default()
        };

        let settings = config.sweep_settings();
        assert_eq!(settings.listing.page_size, 25);
        assert_eq!(settings.listing.pagination, Pagination::SinglePage);
        assert!(settings.apply.dry_run);
        assert_eq!(settings.apply.concurrency, 3);
        assert_eq!(settings.apply.retry.max_retries, 0);
    }
}
