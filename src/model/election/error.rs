use thiserror::Error;

use crate::model::common::election::CandidateIndex;

/// Reasons an election operation is rejected.
///
/// Every rejection leaves the election exactly as it was; the caller decides
/// whether to retry later or with different arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    #[error("Unauthorized: only the election creator can {0}")]
    Unauthorized(&'static str),
    #[error("Phase violation: {0}")]
    PhaseViolation(&'static str),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("You can only participate once")]
    DuplicateApplication,
    #[error("Candidate {0} has already been reviewed")]
    AlreadyReviewed(CandidateIndex),
    #[error("Incomplete review: {0}")]
    IncompleteReview(&'static str),
    #[error("Needs exactly one voting credential to vote, found {0}")]
    NotEligible(u64),
    #[error("Already voted")]
    AlreadyVoted,
    #[error("No candidates applied, so there is nobody to elect")]
    NoCandidates,
}
