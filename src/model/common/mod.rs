//! Types shared between the database, API and core election models.

pub mod election;
pub mod identity;
