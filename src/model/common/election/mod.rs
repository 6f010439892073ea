mod phase;

pub use phase::Phase;

use serde::{Deserialize, Serialize};

/// Our election IDs are sequential integers.
pub type ElectionId = u32;
/// Candidates are addressed by their position in application order.
pub type CandidateIndex = u32;

/// The creator's verdict on one application. Recorded as-is; it does not
/// gate candidacy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewDecision(pub u32);
