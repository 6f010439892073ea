use mongodb::{bson::doc, Database};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    common::identity::{EligibilitySource, Identity},
    eligibility::EligibilityOracle,
};

use super::Coll;

/// One voting credential, as mirrored from its issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub source: EligibilitySource,
    pub holder: Identity,
}

/// Answers eligibility questions from the `credentials` collection.
pub struct MongoCredentials {
    credentials: Coll<Credential>,
}

impl MongoCredentials {
    pub fn from_db(db: &Database) -> Self {
        Self {
            credentials: Coll::from_db(db),
        }
    }
}

#[rocket::async_trait]
impl EligibilityOracle for MongoCredentials {
    async fn credential_count(
        &self,
        holder: &Identity,
        source: &EligibilitySource,
    ) -> Result<u64> {
        let filter = doc! {
            "source": source.as_str(),
            "holder": holder.as_str(),
        };
        Ok(self.credentials.count_documents(filter, None).await?)
    }
}
