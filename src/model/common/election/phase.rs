use serde::{Deserialize, Serialize};

/// Phases in the election lifecycle, in the only order they may occur.
///
/// `ReviewClosed` is never stored: it is derived from a `Reviewing`
/// election whose review deadline has passed.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Created, but the review window has not been opened.
    Created,
    /// Accepting applications until the review deadline.
    Reviewing,
    /// Applications closed; the creator is vetting applicants.
    ReviewClosed,
    /// Accepting votes until the voting deadline, then awaiting the tally.
    Voting,
    /// Votes counted and the winner fixed. Terminal.
    Tallied,
}
