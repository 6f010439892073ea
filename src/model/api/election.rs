use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{
        election::{CandidateIndex, ElectionId, Phase, ReviewDecision},
        identity::{EligibilitySource, Identity},
    },
    election::Election,
};

/// Body of an election creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewElectionRequest {
    pub eligibility_source: EligibilitySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCreated {
    pub id: ElectionId,
}

/// Opens a review or voting window lasting `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRequest {
    pub duration: u32,
}

impl WindowRequest {
    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub label: String,
}

/// Where an accepted application landed in the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub index: CandidateIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub candidate: CandidateIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerResponse {
    pub winner: Identity,
}

/// The public view of an election at a particular instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    /// Election unique ID.
    pub id: ElectionId,
    pub creator: Identity,
    /// Credential set that voters must hold exactly one of.
    pub eligibility_source: EligibilitySource,
    /// Phase as of the moment the summary was taken.
    pub phase: Phase,
    pub review_deadline: Option<DateTime<Utc>>,
    pub voting_deadline: Option<DateTime<Utc>>,
    pub candidate_count: u32,
    pub reviewed_count: u32,
    pub voter_count: u32,
    /// Only present once tallied.
    pub winner: Option<Identity>,
}

impl ElectionSummary {
    pub fn at(election: &Election, now: DateTime<Utc>) -> Self {
        Self {
            id: election.id(),
            creator: election.creator().clone(),
            eligibility_source: election.eligibility_source().clone(),
            phase: election.phase_at(now),
            review_deadline: election.review_deadline(),
            voting_deadline: election.voting_deadline(),
            candidate_count: election.candidate_count(),
            reviewed_count: election.reviewed_count(),
            voter_count: election.voter_count(),
            winner: election.winner().ok().cloned(),
        }
    }
}
