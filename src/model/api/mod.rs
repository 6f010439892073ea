//! API-compatible types.
//!
//! The types in this module are what routes accept and return. They never
//! expose vote counts before an election is tallied.

pub mod auth;
pub mod candidate;
pub mod election;
pub mod pagination;
