use serde::{Deserialize, Serialize};

use crate::model::catalog::Candidate;

/// A candidate together with its current tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDesc {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub vote_count: u64,
}

impl CandidateDesc {
    /// A candidate missing from the tallies has no votes.
    pub fn new(candidate: &Candidate, tally: Option<u64>) -> Self {
        Self {
            candidate: candidate.clone(),
            vote_count: tally.unwrap_or(0),
        }
    }
}
