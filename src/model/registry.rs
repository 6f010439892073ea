use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rocket::tokio::sync::{Mutex, OwnedMutexGuard};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::model::{
    common::{
        election::{CandidateIndex, ElectionId, ReviewDecision},
        identity::{EligibilitySource, Identity},
    },
    eligibility::EligibilityOracle,
    election::{Candidate, Election, ElectionError},
    store::ElectionStore,
};

/// The only way to reach an election.
///
/// Operations on the same election are serialized by a per-election lock:
/// each one loads the record, reads the clock once, applies its transition to
/// a working copy and saves it only if the transition succeeded.
pub struct ElectionRegistry {
    store: Box<dyn ElectionStore>,
    oracle: Box<dyn EligibilityOracle>,
    clock: Box<dyn Clock>,
    locks: Mutex<HashMap<ElectionId, Arc<Mutex<()>>>>,
}

impl ElectionRegistry {
    pub fn new(
        store: impl ElectionStore + 'static,
        oracle: impl EligibilityOracle + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            store: Box::new(store),
            oracle: Box::new(oracle),
            clock: Box::new(clock),
            locks: Mutex::default(),
        }
    }

    /// The registry's current time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a new election owned by `creator`.
    pub async fn create_election(
        &self,
        creator: Identity,
        eligibility_source: EligibilitySource,
    ) -> Result<ElectionId> {
        let id = self.store.next_id().await?;
        let election = Election::new(id, creator, eligibility_source);
        self.store.save(&election).await?;
        info!(
            "Election {id} created by {} with eligibility source {}",
            election.creator(),
            election.eligibility_source()
        );
        Ok(id)
    }

    /// A snapshot of the given election.
    pub async fn get(&self, id: ElectionId) -> Result<Election> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Election with ID '{id}'")))
    }

    pub async fn start_review(
        &self,
        id: ElectionId,
        caller: &Identity,
        duration: Duration,
    ) -> Result<()> {
        self.transition(id, |election, now| {
            election.start_review(caller, duration, now)
        })
        .await?;
        info!("Election {id}: review period started for {duration}");
        Ok(())
    }

    pub async fn apply(
        &self,
        id: ElectionId,
        applicant: Identity,
        label: String,
    ) -> Result<CandidateIndex> {
        let index = self
            .transition(id, |election, now| election.apply(applicant, label, now))
            .await?;
        info!("Election {id}: received application {index}");
        Ok(index)
    }

    pub async fn review(
        &self,
        id: ElectionId,
        caller: &Identity,
        index: CandidateIndex,
        decision: ReviewDecision,
    ) -> Result<()> {
        self.transition(id, |election, now| {
            election.review(caller, index, decision, now)
        })
        .await?;
        info!("Election {id}: candidate {index} reviewed");
        Ok(())
    }

    pub async fn start_voting(
        &self,
        id: ElectionId,
        caller: &Identity,
        duration: Duration,
    ) -> Result<()> {
        self.transition(id, |election, now| {
            election.start_voting(caller, duration, now)
        })
        .await?;
        info!("Election {id}: voting started for {duration}");
        Ok(())
    }

    pub async fn vote(
        &self,
        id: ElectionId,
        voter: Identity,
        index: CandidateIndex,
    ) -> Result<()> {
        let _guard = self.lock(id).await;
        let mut election = self.get(id).await?;
        let now = self.clock.now();
        // The oracle is only worth asking while the vote could be accepted.
        let credentials = if election.voting_open(now) {
            self.oracle
                .credential_count(&voter, election.eligibility_source())
                .await?
        } else {
            0
        };
        election
            .vote(voter, index, credentials, now)
            .map_err(|err| rejected(id, err))?;
        self.store.save(&election).await?;
        debug!("Election {id}: vote recorded");
        Ok(())
    }

    /// Count the votes, returning the winner.
    pub async fn tally(&self, id: ElectionId, caller: &Identity) -> Result<Identity> {
        let winner = self
            .transition(id, |election, now| election.tally(caller, now))
            .await?;
        info!("Election {id}: tallied, winner is {winner}");
        Ok(winner)
    }

    pub async fn get_winner(&self, id: ElectionId) -> Result<Identity> {
        let election = self.get(id).await?;
        Ok(election.winner()?.clone())
    }

    /// The vetted candidate list, with the election it belongs to.
    pub async fn list_candidates(&self, id: ElectionId) -> Result<(Election, Vec<Candidate>)> {
        let election = self.get(id).await?;
        let candidates = election.candidates()?.to_vec();
        Ok((election, candidates))
    }

    /// The candidate list in any review state, for the creator only.
    pub async fn list_candidates_as_creator(
        &self,
        id: ElectionId,
        caller: &Identity,
    ) -> Result<(Election, Vec<Candidate>)> {
        let election = self.get(id).await?;
        let candidates = election.candidates_for_creator(caller)?.to_vec();
        Ok((election, candidates))
    }

    /// Acquire the lock for one election.
    async fn lock(&self, id: ElectionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Handles are only cloned under the map lock, so an entry held by
            // the map alone has no holders or waiters and can be dropped.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Run a synchronous transition against an election under its lock.
    async fn transition<T, F>(&self, id: ElectionId, transition: F) -> Result<T>
    where
        F: FnOnce(&mut Election, DateTime<Utc>) -> std::result::Result<T, ElectionError>,
    {
        let _guard = self.lock(id).await;
        let mut election = self.get(id).await?;
        let outcome = transition(&mut election, self.clock.now()).map_err(|err| rejected(id, err))?;
        self.store.save(&election).await?;
        Ok(outcome)
    }
}

fn rejected(id: ElectionId, err: ElectionError) -> Error {
    debug!("Election {id}: rejected: {err}");
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::futures::future::join_all;

    use crate::clock::ManualClock;
    use crate::model::{eligibility::CredentialBook, store::MemoryStore};

    fn registry() -> (ElectionRegistry, ManualClock, CredentialBook) {
        let clock = ManualClock::default();
        let credentials = CredentialBook::default();
        let registry =
            ElectionRegistry::new(MemoryStore::default(), credentials.clone(), clock.clone());
        (registry, clock, credentials)
    }

    fn creator() -> Identity {
        Identity::from("creator")
    }

    #[rocket::async_test]
    async fn ids_are_monotonic() {
        let (registry, _, _) = registry();
        let a = registry.create_election(creator(), "nft".into()).await.unwrap();
        let b = registry.create_election(creator(), "nft".into()).await.unwrap();
        assert!(b > a);
        assert_eq!(registry.get(a).await.unwrap().creator(), &creator());
    }

    #[rocket::async_test]
    async fn unknown_election_is_not_found() {
        let (registry, _, _) = registry();
        let result = registry.start_review(99, &creator(), Duration::seconds(1)).await;
        assert!(matches!(
            result,
            Err(Error::Election(ElectionError::NotFound(_)))
        ));
    }

    #[rocket::async_test]
    async fn rejected_transition_is_not_saved() {
        let (registry, _, _) = registry();
        let id = registry.create_election(creator(), "nft".into()).await.unwrap();
        let before = registry.get(id).await.unwrap();
        let result = registry
            .start_review(id, &Identity::from("mallory"), Duration::seconds(4))
            .await;
        assert!(result.is_err());
        assert_eq!(registry.get(id).await.unwrap(), before);
    }

    #[rocket::async_test]
    async fn idle_election_locks_are_released() {
        let (registry, _, _) = registry();
        let held = registry.lock(1).await;
        drop(registry.lock(2).await);
        let _other = registry.lock(3).await;

        let mut ids: Vec<_> = registry.locks.lock().await.keys().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);

        drop(held);
        drop(registry.lock(4).await);
        let mut ids: Vec<_> = registry.locks.lock().await.keys().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![3, 4]);
    }

    #[rocket::async_test]
    async fn concurrent_votes_are_all_counted() {
        let (registry, clock, credentials) = registry();
        let id = registry.create_election(creator(), "nft".into()).await.unwrap();
        registry
            .start_review(id, &creator(), Duration::seconds(4))
            .await
            .unwrap();
        registry.apply(id, "alice".into(), "A".into()).await.unwrap();
        clock.advance_secs(4);
        registry
            .review(id, &creator(), 0, ReviewDecision(2))
            .await
            .unwrap();
        registry
            .start_voting(id, &creator(), Duration::seconds(4))
            .await
            .unwrap();

        let voters: Vec<Identity> = (0..20).map(|i| Identity::new(format!("v{i}"))).collect();
        for voter in &voters {
            credentials.issue("nft", voter.clone());
        }
        let votes = voters
            .iter()
            .map(|voter| registry.vote(id, voter.clone(), 0));
        assert!(join_all(votes).await.iter().all(Result::is_ok));

        clock.advance_secs(4);
        registry.tally(id, &creator()).await.unwrap();
        let (_, candidates) = registry.list_candidates(id).await.unwrap();
        assert_eq!(candidates[0].vote_count(), 20);
    }
}
