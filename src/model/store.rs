use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use rocket::{http::Status, tokio::sync::RwLock};

use crate::error::{Error, Result};
use crate::model::{common::election::ElectionId, election::Election};

/// Durable home of election records.
///
/// Records are only ever inserted or replaced whole; nothing is deleted.
#[rocket::async_trait]
pub trait ElectionStore: Send + Sync {
    /// Allocate the next election ID. IDs are never reused.
    async fn next_id(&self) -> Result<ElectionId>;

    /// Fetch a snapshot of the election with the given ID.
    async fn load(&self, id: ElectionId) -> Result<Option<Election>>;

    /// Insert or atomically replace an election record.
    async fn save(&self, election: &Election) -> Result<()>;
}

/// A non-durable store, for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    next: AtomicU32,
    elections: RwLock<HashMap<ElectionId, Election>>,
}

#[rocket::async_trait]
impl ElectionStore for MemoryStore {
    async fn next_id(&self) -> Result<ElectionId> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map_err(|_| {
                Error::Status(
                    Status::InternalServerError,
                    "Election IDs exhausted".to_string(),
                )
            })
    }

    async fn load(&self, id: ElectionId) -> Result<Option<Election>> {
        Ok(self.elections.read().await.get(&id).cloned())
    }

    async fn save(&self, election: &Election) -> Result<()> {
        self.elections
            .write()
            .await
            .insert(election.id(), election.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::common::identity::{EligibilitySource, Identity};

    #[rocket::async_test]
    async fn ids_are_sequential() {
        let store = MemoryStore::default();
        assert_eq!(store.next_id().await.unwrap(), 0);
        assert_eq!(store.next_id().await.unwrap(), 1);
        assert_eq!(store.next_id().await.unwrap(), 2);
    }

    #[rocket::async_test]
    async fn save_replaces_whole_record() {
        let store = MemoryStore::default();
        assert!(store.load(3).await.unwrap().is_none());

        let election = Election::new(3, Identity::from("c"), EligibilitySource::from("s"));
        store.save(&election).await.unwrap();
        store.save(&election).await.unwrap();
        assert_eq!(store.load(3).await.unwrap(), Some(election));
    }
}
