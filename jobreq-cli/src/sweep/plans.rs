//! Plan listing stage
//!
//! Enumerates every plan on the server and drops the excluded ones. Any error
//! here aborts the run: without plans there is nothing left to do.

use jobreq_client::{BambooApi, Result};
use jobreq_core::domain::PlanSummary;
use jobreq_core::filter::PlanExclusion;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Upper bound on listing requests for one run
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// How far to follow the listing's paging metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Follow `start-index` until the server reports no more plans
    #[default]
    Full,
    /// Read exactly one page; plans beyond it are silently missed
    SinglePage,
}

/// Settings for the plan listing stage
#[derive(Debug, Clone)]
pub struct PlanListing {
    pub page_size: usize,
    pub pagination: Pagination,
    pub max_pages: usize,
    pub exclusion: PlanExclusion,
}

impl Default for PlanListing {
    fn default() -> Self {
        Self {
            page_size: 999,
            pagination: Pagination::Full,
            max_pages: DEFAULT_MAX_PAGES,
            exclusion: PlanExclusion::default(),
        }
    }
}

/// Output of the plan listing stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanList {
    /// Plans kept, in listing order
    pub plans: Vec<PlanSummary>,
    /// Keys dropped by the exclusion rule
    pub excluded: Vec<String>,
    /// Listing requests issued
    pub pages: usize,
    /// Whether the server reported plans that were never fetched
    pub truncated: bool,
    pub pagination: Pagination,
}

impl PlanList {
    /// Number of distinct plans seen, excluded ones included
    pub fn seen(&self) -> usize {
        self.plans.len() + self.excluded.len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.plans.iter().map(|p| p.key.clone()).collect()
    }

    /// Truncated although every page was asked for
    ///
    /// A single-page listing is expected to stop early; a full listing that
    /// hit the page cap or stalled is not.
    pub fn is_incomplete(&self) -> bool {
        self.truncated && self.pagination == Pagination::Full
    }
}

/// List the plans to process
pub async fn list_plans(api: &dyn BambooApi, listing: &PlanListing) -> Result<PlanList> {
    let mut result = PlanList {
        pagination: listing.pagination,
        ..Default::default()
    };
    let mut seen = HashSet::new();
    let mut start_index = 0;

    loop {
        let page = api.list_plans(listing.page_size, start_index).await?;
        result.pages += 1;

        let returned = page.plan.len();
        let has_more = page.has_more();
        let total = page.size;
        let next_index = page.start_index.saturating_add(returned);
        let mut fresh = 0;

        for entry in page.plan {
            if !seen.insert(entry.key.clone()) {
                continue;
            }
            fresh += 1;

            if listing.exclusion.is_excluded(&entry.key) {
                debug!("Excluding plan {}", entry.key);
                result.excluded.push(entry.key);
            } else {
                result.plans.push(entry.into());
            }
        }

        debug!(
            "Plan page {}: {} returned, {} new, total {:?}",
            result.pages, returned, fresh, total
        );

        if !has_more {
            break;
        }

        if listing.pagination == Pagination::SinglePage {
            warn!(
                "Plan listing truncated: server reports {:?} plans but only one page of {} was read",
                total, listing.page_size
            );
            result.truncated = true;
            break;
        }

        if returned == 0 || fresh == 0 {
            warn!(
                "Server reported more plans but page {} brought nothing new, stopping",
                result.pages
            );
            result.truncated = true;
            break;
        }

        if result.pages >= listing.max_pages {
            warn!(
                "Stopped plan listing after {} pages; remaining plans were not fetched",
                listing.max_pages
            );
            result.truncated = true;
            break;
        }

        start_index = next_index;
    }

    info!(
        "Listed {} plan(s): {} kept, {} excluded",
        result.seen(),
        result.plans.len(),
        result.excluded.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::fake::FakeBamboo;
    use jobreq_core::domain::ErrorKind;

    #[tokio::test]
    async fn test_excluded_prefix_dropped() {
        let api = FakeBamboo::new().with_plans(["DVOPS-MAIN", "CI-BUILD", "PAY-API", "CI-NIGHTLY"]);

        let list = list_plans(&api, &PlanListing::default()).await.unwrap();
        assert_eq!(list.keys(), vec!["DVOPS-MAIN", "PAY-API"]);
        assert_eq!(list.excluded, vec!["CI-BUILD", "CI-NIGHTLY"]);
        assert_eq!(list.seen(), 4);
        assert_eq!(list.pages, 1);
        assert!(!list.truncated);
    }

    #[tokio::test]
    async fn test_full_pagination_collects_every_page() {
        let keys: Vec<String> = (0..7).map(|i| format!("P{}-MAIN", i)).collect();
        let api = FakeBamboo::new().with_plans(keys.clone());

        let listing = PlanListing {
            page_size: 3,
            ..Default::default()
        };
        let list = list_plans(&api, &listing).await.unwrap();

        assert_eq!(list.keys(), keys);
        assert_eq!(list.pages, 3);
        assert!(!list.truncated);
        assert_eq!(api.plan_requests(), vec![(3, 0), (3, 3), (3, 6)]);
    }

    #[tokio::test]
    async fn test_exact_multiple_of_page_size() {
        let keys: Vec<String> = (0..6).map(|i| format!("P{}-MAIN", i)).collect();
        let api = FakeBamboo::new().with_plans(keys.clone());

        let listing = PlanListing {
            page_size: 3,
            ..Default::default()
        };
        let list = list_plans(&api, &listing).await.unwrap();

        assert_eq!(list.keys(), keys);
        assert_eq!(list.pages, 2);
    }

    #[tokio::test]
    async fn test_single_page_truncates() {
        let keys: Vec<String> = (0..5).map(|i| format!("P{}-MAIN", i)).collect();
        let api = FakeBamboo::new().with_plans(keys);

        let listing = PlanListing {
            page_size: 2,
            pagination: Pagination::SinglePage,
            ..Default::default()
        };
        let list = list_plans(&api, &listing).await.unwrap();

        assert_eq!(list.keys(), vec!["P0-MAIN", "P1-MAIN"]);
        assert!(list.truncated);
        assert!(!list.is_incomplete());
        assert_eq!(api.plan_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_dropped() {
        let api = FakeBamboo::new()
            .with_plans(["A-ONE", "B-TWO", "C-THREE"])
            .with_overlapping_pages();

        let listing = PlanListing {
            page_size: 2,
            ..Default::default()
        };
        let list = list_plans(&api, &listing).await.unwrap();

        assert_eq!(list.keys(), vec!["A-ONE", "B-TWO", "C-THREE"]);
    }

    #[tokio::test]
    async fn test_page_cap_stops_runaway_listing() {
        let keys: Vec<String> = (0..10).map(|i| format!("P{}-MAIN", i)).collect();
        let api = FakeBamboo::new().with_plans(keys);

        let listing = PlanListing {
            page_size: 1,
            max_pages: 4,
            ..Default::default()
        };
        let list = list_plans(&api, &listing).await.unwrap();

        assert_eq!(list.plans.len(), 4);
        assert!(list.truncated);
        assert!(list.is_incomplete());
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let api = FakeBamboo::new().with_plans(["A-ONE"]).failing_plan_listing(401);

        let err = list_plans(&api, &PlanListing::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }
}
