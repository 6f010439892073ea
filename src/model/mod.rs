pub mod api;
pub mod common;
pub mod election;
pub mod eligibility;
pub mod mongodb;
pub mod registry;
pub mod store;
