//! Core domain types
//!
//! These types describe what a single sweep discovers and produces. None of
//! them outlive a run: every invocation performs a full fresh discovery.

pub mod credentials;
pub mod error;
pub mod job;
pub mod outcome;
pub mod plan;
pub mod requirement;

pub use credentials::Credentials;
pub use error::ErrorKind;
pub use job::JobSummary;
pub use outcome::{ApplyOutcome, ApplyStatus, PlanFailure};
pub use plan::PlanSummary;
pub use requirement::{DEFAULT_MATCH_TYPE, DEFAULT_REQUIREMENT_KEY, RequirementSpec};
