use serde::{Deserialize, Serialize};

use crate::model::{
    common::{
        election::{CandidateIndex, ReviewDecision},
        identity::Identity,
    },
    election::{Candidate, Election},
};

/// An API-friendly candidate, addressed by its index in the election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateView {
    pub index: CandidateIndex,
    pub applicant: Identity,
    pub label: String,
    pub reviewed: bool,
    pub decision: Option<ReviewDecision>,
    /// Withheld until the election has been tallied.
    pub votes: Option<u32>,
}

impl CandidateView {
    /// Views of `candidates`, in order, as they belong to `election`.
    pub fn list(election: &Election, candidates: &[Candidate]) -> Vec<Self> {
        let tallied = election.is_tallied();
        candidates
            .iter()
            .zip(0..)
            .map(|(candidate, index)| Self {
                index,
                applicant: candidate.applicant().clone(),
                label: candidate.label().to_string(),
                reviewed: candidate.reviewed(),
                decision: candidate.decision(),
                votes: tallied.then(|| candidate.vote_count()),
            })
            .collect()
    }
}
