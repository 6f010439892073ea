use mongodb::{bson::doc, options::ReplaceOptions, Database};

use crate::error::Result;
use crate::model::{common::election::ElectionId, election::Election, store::ElectionStore};

use super::{
    counter::{Counter, ELECTION_ID_COUNTER_ID},
    Coll,
};

/// Election records in MongoDB, one document per election.
pub struct MongoStore {
    elections: Coll<Election>,
    counters: Coll<Counter>,
}

impl MongoStore {
    pub fn from_db(db: &Database) -> Self {
        Self {
            elections: Coll::from_db(db),
            counters: Coll::from_db(db),
        }
    }
}

#[rocket::async_trait]
impl ElectionStore for MongoStore {
    async fn next_id(&self) -> Result<ElectionId> {
        Counter::next(&self.counters, ELECTION_ID_COUNTER_ID).await
    }

    async fn load(&self, id: ElectionId) -> Result<Option<Election>> {
        Ok(self.elections.find_one(doc! {"_id": id}, None).await?)
    }

    async fn save(&self, election: &Election) -> Result<()> {
        // A single-document replace is atomic, so a record is never half-written.
        let options = ReplaceOptions::builder().upsert(true).build();
        self.elections
            .replace_one(doc! {"_id": election.id()}, election, options)
            .await?;
        Ok(())
    }
}
