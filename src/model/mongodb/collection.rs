use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use crate::model::election::Election;

use super::{counter::Counter, credentials::Credential};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for Election {
    const NAME: &'static str = "elections";
}

impl MongoCollection for Counter {
    const NAME: &'static str = "counters";
}

impl MongoCollection for Credential {
    const NAME: &'static str = "credentials";
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // Eligibility lookups count by source then holder. Not unique: holding
    // several credentials is exactly what makes a voter ineligible.
    let credential_index = IndexModel::builder()
        .keys(doc! {"source": 1, "holder": 1})
        .options(IndexOptions::builder().name("source_holder".to_string()).build())
        .build();
    Coll::<Credential>::from_db(db)
        .create_index(credential_index, None)
        .await?;

    Ok(())
}
