//! Jobreq Core
//!
//! Core types for the jobreq requirement sweeper.
//!
//! This crate contains:
//! - Domain types: plans, jobs, requirements and per-job outcomes
//! - DTOs: wire envelopes of the Bamboo REST API
//! - Filters: plan exclusion and job name matching

pub mod domain;
pub mod dto;
pub mod filter;
