use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{
    catalog::Catalog,
    common::{CandidateId, Category, VoteId, VoterId},
    validation::BallotHistory,
    vote::{Selection, Vote},
    voter::Voter,
};

use super::CommitError;

/// The ballot log together with every index derived from it.
///
/// Only [`Ledger::commit`] appends to the log, and it updates the indices and
/// tallies in the same step, so they can never drift from the log.
#[derive(Debug)]
pub(super) struct Ledger {
    voters: HashMap<VoterId, Voter>,
    votes: Vec<Vote>,
    by_voter: HashMap<VoterId, Vec<usize>>,
    by_category: HashMap<Category, Vec<usize>>,
    tallies: HashMap<CandidateId, u64>,
    next_vote_id: u64,
}

impl Ledger {
    pub fn new(catalog: &Catalog) -> Self {
        let tallies = catalog
            .list_candidates()
            .iter()
            .map(|candidate| (candidate.id.clone(), 0))
            .collect();
        Self {
            voters: HashMap::new(),
            votes: Vec::new(),
            by_voter: HashMap::new(),
            by_category: HashMap::new(),
            tallies,
            next_vote_id: 1,
        }
    }

    pub fn voter(&self, id: &VoterId) -> Option<&Voter> {
        self.voters.get(id)
    }

    /// Insert the voter unless one with the same ID exists; return the stored record.
    pub fn register(&mut self, voter: Voter) -> &Voter {
        self.voters.entry(voter.id.clone()).or_insert(voter)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn votes_by_voter(&self, voter: &VoterId) -> impl Iterator<Item = &Vote> {
        self.indexed(self.by_voter.get(voter))
    }

    pub fn votes_by_category(&self, category: Category) -> impl Iterator<Item = &Vote> {
        self.indexed(self.by_category.get(&category))
    }

    fn indexed<'a>(&'a self, positions: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a Vote> {
        positions
            .into_iter()
            .flatten()
            .map(move |&position| &self.votes[position])
    }

    pub fn tally(&self, candidate: &str) -> Option<u64> {
        self.tallies.get(candidate).copied()
    }

    pub fn tallies(&self) -> &HashMap<CandidateId, u64> {
        &self.tallies
    }

    /// Count votes per candidate straight from the log, ignoring the maintained tallies.
    pub fn recount(&self) -> HashMap<CandidateId, u64> {
        let mut counts: HashMap<CandidateId, u64> =
            self.tallies.keys().map(|id| (id.clone(), 0)).collect();
        for vote in &self.votes {
            *counts.entry(vote.candidate_id.clone()).or_default() += 1;
        }
        counts
    }

    /// Append one vote per selection, or nothing at all.
    ///
    /// Every selection is checked before anything is written, and the write
    /// phase cannot fail, so a rejected batch leaves no trace.
    pub fn commit(
        &mut self,
        catalog: &Catalog,
        voter: &VoterId,
        selections: &[Selection],
        now: DateTime<Utc>,
    ) -> Result<Vec<Vote>, CommitError> {
        if selections.is_empty() {
            return Err(CommitError::NothingSelected);
        }
        if !self.voters.contains_key(voter) {
            return Err(CommitError::UnknownVoter(voter.clone()));
        }

        let mut conflicts = Vec::new();
        for (i, selection) in selections.iter().enumerate() {
            let candidate = catalog
                .find_candidate(&selection.candidate_id)
                .ok_or_else(|| CommitError::UnknownCandidate(selection.candidate_id.clone()))?;
            if candidate.category != selection.category {
                return Err(CommitError::CategoryMismatch {
                    candidate: candidate.id.clone(),
                    category: selection.category,
                });
            }
            let repeated = selections[..i]
                .iter()
                .any(|s| s.category == selection.category);
            if (repeated || self.has_voted_in(voter, selection.category))
                && !conflicts.contains(&selection.category)
            {
                conflicts.push(selection.category);
            }
        }
        if !conflicts.is_empty() {
            return Err(CommitError::Conflict {
                voter: voter.clone(),
                categories: conflicts,
            });
        }

        let mut committed = Vec::with_capacity(selections.len());
        for selection in selections {
            let vote = Vote {
                id: VoteId(self.next_vote_id),
                voter_id: voter.clone(),
                candidate_id: selection.candidate_id.clone(),
                category: selection.category,
                voted_at: now,
            };
            self.next_vote_id += 1;
            self.append(vote.clone());
            committed.push(vote);
        }
        Ok(committed)
    }

    fn append(&mut self, vote: Vote) {
        let position = self.votes.len();
        self.by_voter
            .entry(vote.voter_id.clone())
            .or_default()
            .push(position);
        self.by_category
            .entry(vote.category)
            .or_default()
            .push(position);
        *self.tallies.entry(vote.candidate_id.clone()).or_default() += 1;
        self.votes.push(vote);
    }
}

impl BallotHistory for Ledger {
    fn is_registered(&self, voter: &VoterId) -> bool {
        self.voters.contains_key(voter)
    }

    fn has_voted_in(&self, voter: &VoterId, category: Category) -> bool {
        self.votes_by_voter(voter)
            .any(|vote| vote.category == category)
    }
}
