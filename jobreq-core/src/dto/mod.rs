//! Data Transfer Objects for the Bamboo REST API
//!
//! Wire envelopes returned by the listing and search endpoints. They are
//! converted into domain types as soon as they are parsed.

pub mod job;
pub mod plan;
