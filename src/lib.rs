//! Projection Resolver - expression resolution for a query planner
//!
//! This crate turns user-written projection expressions into typed expressions
//! through:
//! - Field resolution against an input schema
//! - Flatten expansion of structured columns
//! - Output type inference for calls

pub mod config;
pub mod query_planner;
