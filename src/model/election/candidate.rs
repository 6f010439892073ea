use serde::{Deserialize, Serialize};

use crate::model::common::{election::ReviewDecision, identity::Identity};

/// A single application, as stored in its election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    applicant: Identity,
    label: String,
    decision: Option<ReviewDecision>,
    vote_count: u32,
}

impl Candidate {
    pub(super) fn new(applicant: Identity, label: String) -> Self {
        Self {
            applicant,
            label,
            decision: None,
            vote_count: 0,
        }
    }

    pub fn applicant(&self) -> &Identity {
        &self.applicant
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reviewed(&self) -> bool {
        self.decision.is_some()
    }

    pub fn decision(&self) -> Option<ReviewDecision> {
        self.decision
    }

    /// Raw vote counter. Only meaningful once the election is tallied.
    pub fn vote_count(&self) -> u32 {
        self.vote_count
    }

    pub(super) fn record_review(&mut self, decision: ReviewDecision) {
        self.decision = Some(decision);
    }

    pub(super) fn add_vote(&mut self) {
        self.vote_count += 1;
    }
}
