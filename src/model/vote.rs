use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, Category, VoteId, VoterId};

/// A committed vote. Immutable once created; the ballot log is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Assigned by the store at commit time.
    pub id: VoteId,
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
    pub category: Category,
    /// Assigned by the store at commit time.
    pub voted_at: DateTime<Utc>,
}

/// A not-yet-committed choice of candidate within one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub candidate_id: CandidateId,
    /// Only used to phrase feedback; never trusted for anything else.
    #[serde(default)]
    pub candidate_name: String,
    pub category: Category,
}

impl Selection {
    pub fn new(candidate_id: impl Into<CandidateId>, category: Category) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            candidate_name: String::new(),
            category,
        }
    }

    /// The name to mention in messages, falling back to the ID.
    pub fn display_name(&self) -> &str {
        if self.candidate_name.is_empty() {
            &self.candidate_id
        } else {
            &self.candidate_name
        }
    }
}
