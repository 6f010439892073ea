//! MongoDB-backed storage for election records and voting credentials.

mod collection;
mod counter;
mod credentials;
pub mod optional_datetime;
mod store;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{ensure_election_id_counter_exists, Counter, ELECTION_ID_COUNTER_ID};
pub use credentials::{Credential, MongoCredentials};
pub use store::MongoStore;

#[cfg(test)]
pub(crate) mod testing;
