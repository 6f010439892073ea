//! The election record and its lifecycle state machine.
//!
//! Everything in here is synchronous and free of I/O: callers supply the
//! current time and the voter's credential count, and get back either the
//! mutated election or an [`ElectionError`] with the election untouched.

mod candidate;
mod error;
mod record;
mod tally;

pub use candidate::Candidate;
pub use error::ElectionError;
pub use record::Election;
pub use tally::leading_candidate;

#[cfg(test)]
pub(crate) use record::examples;
