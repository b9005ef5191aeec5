use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    api::CandidateDesc,
    common::{CandidateId, Category, VoteId, VoterId},
    vote::Vote,
};

/// Results for one category, leading candidate first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResults {
    pub category: Category,
    pub total_votes: u64,
    pub candidates: Vec<CandidateDesc>,
}

impl CategoryResults {
    /// Orders candidates by tally, most votes first, then by name.
    pub fn new(category: Category, total_votes: u64, mut candidates: Vec<CandidateDesc>) -> Self {
        candidates.sort_by(|a, b| {
            b.vote_count
                .cmp(&a.vote_count)
                .then_with(|| a.candidate.name.cmp(&b.candidate.name))
        });
        Self {
            category,
            total_votes,
            candidates,
        }
    }
}

/// Overall results, as shown on the administrator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_votes: u64,
    /// Voters on the electoral roll.
    pub registered_voters: u64,
    /// Distinct voters with at least one recorded vote.
    pub participating_voters: u64,
    pub categories: Vec<CategoryResults>,
}

/// A consistent snapshot of the catalog tallies and the full ballot log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotDump {
    pub candidates: Vec<CandidateDesc>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Candidate {candidate_id} is listed more than once")]
    DuplicateCandidate { candidate_id: CandidateId },
    #[error("Vote {vote_id} references unknown candidate {candidate_id}")]
    UnknownCandidate {
        vote_id: VoteId,
        candidate_id: CandidateId,
    },
    #[error("Vote {vote_id} is in a different category from candidate {candidate_id}")]
    CategoryMismatch {
        vote_id: VoteId,
        candidate_id: CandidateId,
    },
    #[error("Voter {voter_id} has more than one vote in the {category} category")]
    DuplicateVote { voter_id: VoterId, category: Category },
    #[error("Candidate {candidate_id} reports {reported} votes but the log holds {counted}")]
    Tally {
        candidate_id: CandidateId,
        reported: u64,
        counted: u64,
    },
}

impl BallotDump {
    /// Independently re-check the dump: one vote per voter and category, every
    /// vote for a known candidate of the same category, and every tally equal
    /// to the number of votes referencing its candidate.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut candidates = HashMap::with_capacity(self.candidates.len());
        for desc in &self.candidates {
            if candidates.insert(&desc.candidate.id, desc).is_some() {
                return Err(VerificationError::DuplicateCandidate {
                    candidate_id: desc.candidate.id.clone(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.votes.len());
        let mut counted: HashMap<&CandidateId, u64> = HashMap::new();
        for vote in &self.votes {
            let desc = candidates.get(&vote.candidate_id).ok_or_else(|| {
                VerificationError::UnknownCandidate {
                    vote_id: vote.id,
                    candidate_id: vote.candidate_id.clone(),
                }
            })?;
            if desc.candidate.category != vote.category {
                return Err(VerificationError::CategoryMismatch {
                    vote_id: vote.id,
                    candidate_id: vote.candidate_id.clone(),
                });
            }
            if !seen.insert((&vote.voter_id, vote.category)) {
                return Err(VerificationError::DuplicateVote {
                    voter_id: vote.voter_id.clone(),
                    category: vote.category,
                });
            }
            *counted.entry(&vote.candidate_id).or_default() += 1;
        }

        for desc in &self.candidates {
            let counted = counted.get(&desc.candidate.id).copied().unwrap_or(0);
            if desc.vote_count != counted {
                return Err(VerificationError::Tally {
                    candidate_id: desc.candidate.id.clone(),
                    reported: desc.vote_count,
                    counted,
                });
            }
        }

        Ok(())
    }
}
