use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{
        election::{CandidateIndex, ElectionId, Phase, ReviewDecision},
        identity::{EligibilitySource, Identity},
    },
    mongodb::optional_datetime,
};

use super::{candidate::Candidate, error::ElectionError, tally::leading_candidate};

type Outcome<T> = Result<T, ElectionError>;

/// One election and everything that has happened to it.
///
/// Every transition takes the current time explicitly; phases that depend on
/// a deadline are derived from it rather than stored. A method that returns
/// `Err` has not modified the election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    #[serde(rename = "_id")]
    id: ElectionId,
    creator: Identity,
    eligibility_source: EligibilitySource,
    /// Stored phase; never `ReviewClosed`.
    phase: Phase,
    #[serde(default, with = "optional_datetime")]
    review_deadline: Option<DateTime<Utc>>,
    #[serde(default, with = "optional_datetime")]
    voting_deadline: Option<DateTime<Utc>>,
    /// In application order.
    candidates: Vec<Candidate>,
    reviewed_count: u32,
    voters: HashSet<Identity>,
    winner: Option<Identity>,
}

impl Election {
    /// Create a new election awaiting its review window.
    pub fn new(id: ElectionId, creator: Identity, eligibility_source: EligibilitySource) -> Self {
        Self {
            id,
            creator,
            eligibility_source,
            phase: Phase::Created,
            review_deadline: None,
            voting_deadline: None,
            candidates: Vec::new(),
            reviewed_count: 0,
            voters: HashSet::new(),
            winner: None,
        }
    }

    pub fn id(&self) -> ElectionId {
        self.id
    }

    pub fn creator(&self) -> &Identity {
        &self.creator
    }

    pub fn eligibility_source(&self) -> &EligibilitySource {
        &self.eligibility_source
    }

    pub fn review_deadline(&self) -> Option<DateTime<Utc>> {
        self.review_deadline
    }

    pub fn voting_deadline(&self) -> Option<DateTime<Utc>> {
        self.voting_deadline
    }

    pub fn candidate_count(&self) -> u32 {
        self.candidates.len() as u32
    }

    pub fn reviewed_count(&self) -> u32 {
        self.reviewed_count
    }

    pub fn voter_count(&self) -> u32 {
        self.voters.len() as u32
    }

    pub fn is_tallied(&self) -> bool {
        self.phase == Phase::Tallied
    }

    pub fn is_fully_reviewed(&self) -> bool {
        self.reviewed_count == self.candidate_count()
    }

    /// The phase as seen at time `now`.
    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        match self.phase {
            Phase::Reviewing if passed(self.review_deadline, now) => Phase::ReviewClosed,
            phase => phase,
        }
    }

    /// Is the voting window open at time `now`?
    pub fn voting_open(&self, now: DateTime<Utc>) -> bool {
        self.phase == Phase::Voting && !passed(self.voting_deadline, now)
    }

    fn ensure_creator(&self, caller: &Identity, action: &'static str) -> Outcome<()> {
        if *caller == self.creator {
            Ok(())
        } else {
            Err(ElectionError::Unauthorized(action))
        }
    }

    fn candidate_mut(&mut self, index: CandidateIndex) -> Outcome<&mut Candidate> {
        self.candidates
            .get_mut(index as usize)
            .ok_or_else(|| ElectionError::NotFound(format!("Candidate with index {index}")))
    }

    /// Open the application window for `duration`.
    pub fn start_review(
        &mut self,
        caller: &Identity,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Outcome<()> {
        self.ensure_creator(caller, "start the review period")?;
        if self.phase != Phase::Created {
            return Err(ElectionError::PhaseViolation(
                "The review period has already been started",
            ));
        }
        self.review_deadline = Some(now + duration);
        self.phase = Phase::Reviewing;
        Ok(())
    }

    /// Apply as a candidate, returning the stable index of the application.
    pub fn apply(
        &mut self,
        applicant: Identity,
        label: String,
        now: DateTime<Utc>,
    ) -> Outcome<CandidateIndex> {
        match self.phase_at(now) {
            Phase::Reviewing => {}
            Phase::Created => {
                return Err(ElectionError::PhaseViolation(
                    "Let the election creator start the review time",
                ))
            }
            _ => {
                return Err(ElectionError::PhaseViolation(
                    "The review time ended for the election",
                ))
            }
        }
        if self.candidates.iter().any(|c| *c.applicant() == applicant) {
            return Err(ElectionError::DuplicateApplication);
        }
        let index = self.candidate_count();
        self.candidates.push(Candidate::new(applicant, label));
        Ok(index)
    }

    /// Record the creator's decision on one application. Only possible once
    /// every application is in, i.e. after the review deadline.
    pub fn review(
        &mut self,
        caller: &Identity,
        index: CandidateIndex,
        decision: ReviewDecision,
        now: DateTime<Utc>,
    ) -> Outcome<()> {
        self.ensure_creator(caller, "review the candidates")?;
        match self.phase_at(now) {
            Phase::ReviewClosed => {}
            Phase::Created | Phase::Reviewing => {
                return Err(ElectionError::PhaseViolation(
                    "Let the review period be complete to start reviewing the candidates",
                ))
            }
            Phase::Voting | Phase::Tallied => {
                return Err(ElectionError::PhaseViolation(
                    "Candidates cannot be reviewed once voting has started",
                ))
            }
        }
        let candidate = self.candidate_mut(index)?;
        if candidate.reviewed() {
            return Err(ElectionError::AlreadyReviewed(index));
        }
        candidate.record_review(decision);
        self.reviewed_count += 1;
        Ok(())
    }

    /// Open the voting window for `duration`.
    pub fn start_voting(
        &mut self,
        caller: &Identity,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Outcome<()> {
        self.ensure_creator(caller, "start the election period")?;
        match self.phase_at(now) {
            Phase::ReviewClosed => {}
            Phase::Created => {
                return Err(ElectionError::PhaseViolation(
                    "The review period has not been started",
                ))
            }
            Phase::Reviewing => {
                return Err(ElectionError::PhaseViolation(
                    "Let the review period be complete to start election",
                ))
            }
            Phase::Voting | Phase::Tallied => {
                return Err(ElectionError::PhaseViolation(
                    "The election period has already been started",
                ))
            }
        }
        if !self.is_fully_reviewed() {
            return Err(ElectionError::IncompleteReview(
                "All the candidates should be reviewed before voting starts",
            ));
        }
        self.voting_deadline = Some(now + duration);
        self.phase = Phase::Voting;
        Ok(())
    }

    /// Cast `voter`'s single vote. `credentials` is how many voting
    /// credentials the voter holds in this election's eligibility source.
    pub fn vote(
        &mut self,
        voter: Identity,
        index: CandidateIndex,
        credentials: u64,
        now: DateTime<Utc>,
    ) -> Outcome<()> {
        if !self.voting_open(now) {
            return Err(ElectionError::PhaseViolation(
                "You can only vote in the election time",
            ));
        }
        if credentials != 1 {
            return Err(ElectionError::NotEligible(credentials));
        }
        if self.voters.contains(&voter) {
            return Err(ElectionError::AlreadyVoted);
        }
        self.candidate_mut(index)?.add_vote();
        self.voters.insert(voter);
        Ok(())
    }

    /// Count the votes and fix the winner. Exactly once, after voting closes.
    pub fn tally(&mut self, caller: &Identity, now: DateTime<Utc>) -> Outcome<Identity> {
        self.ensure_creator(caller, "start the counting process")?;
        match self.phase {
            Phase::Voting if passed(self.voting_deadline, now) => {}
            Phase::Voting => {
                return Err(ElectionError::PhaseViolation(
                    "Votes can only be counted once the election time is over",
                ))
            }
            Phase::Tallied => {
                return Err(ElectionError::PhaseViolation(
                    "The votes have already been counted",
                ))
            }
            _ => {
                return Err(ElectionError::PhaseViolation(
                    "The election period has not been started",
                ))
            }
        }
        let index = leading_candidate(&self.candidates).ok_or(ElectionError::NoCandidates)?;
        let winner = self.candidates[index as usize].applicant().clone();
        self.winner = Some(winner.clone());
        self.phase = Phase::Tallied;
        Ok(winner)
    }

    /// The winner, once tallied.
    pub fn winner(&self) -> Outcome<&Identity> {
        match (&self.phase, &self.winner) {
            (Phase::Tallied, Some(winner)) => Ok(winner),
            _ => Err(ElectionError::PhaseViolation(
                "The votes have not been counted yet",
            )),
        }
    }

    /// The candidate list as anyone may see it: only once fully vetted.
    pub fn candidates(&self) -> Outcome<&[Candidate]> {
        if self.is_fully_reviewed() {
            Ok(&self.candidates)
        } else {
            Err(ElectionError::IncompleteReview(
                "All the candidates should be reviewed before you can fetch the list",
            ))
        }
    }

    /// The candidate list as the creator sees it, whatever the review state.
    pub fn candidates_for_creator(&self, caller: &Identity) -> Outcome<&[Candidate]> {
        self.ensure_creator(caller, "access the full candidate list")?;
        Ok(&self.candidates)
    }
}

/// Has the optional deadline been reached at `now`? An unset deadline never
/// passes.
fn passed(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.map_or(false, |deadline| now >= deadline)
}
