//! The ballot store: the process-lifetime record of voters and committed votes.
//!
//! A [`BallotStore`] is a cheap handle; clones share the same ledger. All
//! mutations take the write lock for their whole check-then-act sequence, so
//! two commits can never both observe "no vote yet" for the same voter and
//! category. Reads share the read lock and always see a consistent snapshot.

mod ledger;
mod seed;

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use rand::Rng;
use rocket::tokio::sync::RwLock;
use thiserror::Error;

use crate::model::{
    api::{BallotDump, CandidateDesc, CategoryResults, ResultsSummary},
    catalog::Catalog,
    common::{CandidateId, Category, VoterId},
    validation::{self, Validation},
    vote::{Selection, Vote},
    voter::Voter,
};

use ledger::Ledger;

/// Reasons the store refuses a batch. Nothing from a refused batch is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("No selections to commit")]
    NothingSelected,
    #[error("Voter {0} is not on the electoral roll")]
    UnknownVoter(VoterId),
    #[error("Candidate '{0}' does not exist")]
    UnknownCandidate(CandidateId),
    #[error("Candidate '{candidate}' does not stand in the {category} category")]
    CategoryMismatch {
        candidate: CandidateId,
        category: Category,
    },
    /// The voter already has, or the batch would create, a second vote in a category.
    #[error("Voter {voter} already has a vote in: {}", Category::join_labels(.categories))]
    Conflict {
        voter: VoterId,
        categories: Vec<Category>,
    },
}

#[derive(Clone)]
pub struct BallotStore {
    catalog: Arc<Catalog>,
    ledger: Arc<RwLock<Ledger>>,
}

impl BallotStore {
    /// Create an empty store over the given catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let ledger = Ledger::new(&catalog);
        Self {
            catalog,
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn find_voter(&self, id: &VoterId) -> Option<Voter> {
        self.ledger.read().await.voter(id).cloned()
    }

    /// Register a voter. Idempotent per ID: an existing record is returned unchanged.
    pub async fn register_voter(&self, voter: Voter) -> Voter {
        self.ledger.write().await.register(voter).clone()
    }

    /// Look the voter up, registering a synthesized profile on first sight.
    pub async fn find_or_register(&self, id: VoterId) -> Voter {
        if let Some(voter) = self.find_voter(&id).await {
            return voter;
        }
        debug!("Registering new voter {id}");
        self.register_voter(Voter::synthesize(id)).await
    }

    pub async fn votes_by_voter(&self, voter: &VoterId) -> Vec<Vote> {
        self.ledger
            .read()
            .await
            .votes_by_voter(voter)
            .cloned()
            .collect()
    }

    pub async fn votes_by_category(&self, category: Category) -> Vec<Vote> {
        self.ledger
            .read()
            .await
            .votes_by_category(category)
            .cloned()
            .collect()
    }

    /// Run the validation engine against the current state. Has no side effects.
    pub async fn validate_batch(&self, voter_id: &str, selections: &[Selection]) -> Validation {
        let ledger = self.ledger.read().await;
        validation::validate_batch(voter_id, selections, &self.catalog, &*ledger)
    }

    /// Record one vote per selection, in input order, or none at all.
    ///
    /// Callers are expected to have validated the batch first; the invariants
    /// are checked again here under the write lock. Once the lock is held the
    /// commit runs without suspending, so it cannot be cancelled half-way.
    pub async fn commit_batch(
        &self,
        voter: &VoterId,
        selections: &[Selection],
    ) -> Result<Vec<Vote>, CommitError> {
        let mut ledger = self.ledger.write().await;
        match ledger.commit(&self.catalog, voter, selections, Utc::now()) {
            Ok(votes) => {
                let categories: Vec<_> = votes.iter().map(|vote| vote.category).collect();
                info!(
                    "Recorded {} vote(s) for voter {voter} in: {}",
                    votes.len(),
                    Category::join_labels(&categories)
                );
                Ok(votes)
            }
            Err(err) => {
                warn!("Rejected commit for voter {voter}: {err}");
                Err(err)
            }
        }
    }

    /// Current tally for a candidate, or `None` if it is not in the catalog.
    pub async fn tally(&self, candidate: &str) -> Option<u64> {
        self.ledger.read().await.tally(candidate)
    }

    /// A copy of every maintained tally, keyed by candidate.
    pub async fn tallies(&self) -> HashMap<CandidateId, u64> {
        self.ledger.read().await.tallies().clone()
    }

    /// Catalog candidates with their tallies, optionally restricted to one category.
    pub async fn candidates(&self, category: Option<Category>) -> Vec<CandidateDesc> {
        let ledger = self.ledger.read().await;
        self.catalog
            .list_candidates()
            .iter()
            .filter(|candidate| category.map_or(true, |c| candidate.category == c))
            .map(|candidate| CandidateDesc::new(candidate, ledger.tally(&candidate.id)))
            .collect()
    }

    pub async fn candidate(&self, id: &str) -> Option<CandidateDesc> {
        let ledger = self.ledger.read().await;
        self.catalog
            .find_candidate(id)
            .map(|candidate| CandidateDesc::new(candidate, ledger.tally(&candidate.id)))
    }

    /// Aggregate results over a single snapshot.
    pub async fn summary(&self) -> ResultsSummary {
        let ledger = self.ledger.read().await;
        let mut participants: Vec<_> = ledger.votes().iter().map(|vote| &vote.voter_id).collect();
        participants.sort_unstable();
        participants.dedup();

        let categories = Category::ALL
            .into_iter()
            .map(|category| {
                let candidates = self
                    .catalog
                    .candidates_in(category)
                    .map(|candidate| CandidateDesc::new(candidate, ledger.tally(&candidate.id)))
                    .collect();
                CategoryResults::new(
                    category,
                    ledger.votes_by_category(category).count() as u64,
                    candidates,
                )
            })
            .collect();

        ResultsSummary {
            total_votes: ledger.votes().len() as u64,
            registered_voters: ledger.voter_count() as u64,
            participating_voters: participants.len() as u64,
            categories,
        }
    }

    /// Everything needed to independently re-check the tallies.
    pub async fn dump(&self) -> BallotDump {
        let ledger = self.ledger.read().await;
        BallotDump {
            candidates: self
                .catalog
                .list_candidates()
                .iter()
                .map(|candidate| CandidateDesc::new(candidate, ledger.tally(&candidate.id)))
                .collect(),
            votes: ledger.votes().to_vec(),
        }
    }

    /// Fill the store with `count` random historical votes from synthesized voters.
    /// Returns how many were actually recorded.
    pub async fn seed<R: Rng>(&self, count: u32, rng: &mut R) -> u32 {
        let mut ledger = self.ledger.write().await;
        seed::seed_ledger(&mut ledger, &self.catalog, count, rng)
    }
}

#[cfg(test)]
mod tests;
