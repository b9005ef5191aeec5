//! The validation engine: pure decision logic over a proposed batch of selections.
//!
//! Checks run in a fixed order. A malformed or unknown voter short-circuits,
//! since nothing else can be judged without a voter; every other check runs to
//! completion so the caller sees every problem at once.

use crate::model::{
    catalog::Catalog,
    common::{Category, VoterId},
    vote::Selection,
};

pub const INVALID_VOTER_ID_MESSAGE: &str = "Invalid voter identifier: it must be exactly 8 digits";
pub const UNKNOWN_VOTER_MESSAGE: &str = "Voter identifier not found in the electoral roll";

/// Read-only view of the voting history the engine consults.
pub trait BallotHistory {
    /// Is the voter on the roll?
    fn is_registered(&self, voter: &VoterId) -> bool;
    /// Has the voter already got a vote recorded in this category?
    fn has_voted_in(&self, voter: &VoterId, category: Category) -> bool;
}

/// Outcome of validating a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// The batch may be committed.
    Valid,
    /// Every problem found, in check order, without repeats.
    Invalid(Vec<String>),
    /// The batch was empty; there is nothing to judge.
    NothingSelected,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Ordered, deduplicated list of rejection messages.
#[derive(Debug, Default)]
struct Messages(Vec<String>);

impl Messages {
    fn push(&mut self, message: String) {
        if !self.0.contains(&message) {
            self.0.push(message);
        }
    }

    fn into_validation(self) -> Validation {
        if self.0.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(self.0)
        }
    }
}

/// Decide whether `selections` may be committed for `voter_id`.
pub fn validate_batch<H>(
    voter_id: &str,
    selections: &[Selection],
    catalog: &Catalog,
    history: &H,
) -> Validation
where
    H: BallotHistory + ?Sized,
{
    if selections.is_empty() {
        return Validation::NothingSelected;
    }

    // Identity shape.
    let voter_id = match VoterId::parse(voter_id) {
        Ok(id) => id,
        Err(_) => return Validation::Invalid(vec![INVALID_VOTER_ID_MESSAGE.to_string()]),
    };

    // Voter known.
    if !history.is_registered(&voter_id) {
        return Validation::Invalid(vec![UNKNOWN_VOTER_MESSAGE.to_string()]);
    }

    let mut messages = Messages::default();

    // No duplicate category votes, either against history or within the batch.
    let mut already_voted = Vec::new();
    let mut repeated = Vec::new();
    for (i, selection) in selections.iter().enumerate() {
        let category = selection.category;
        if history.has_voted_in(&voter_id, category) && !already_voted.contains(&category) {
            already_voted.push(category);
        }
        let seen_before = selections[..i].iter().any(|s| s.category == category);
        if seen_before && !repeated.contains(&category) {
            repeated.push(category);
        }
    }
    if !already_voted.is_empty() {
        messages.push(format!(
            "Already voted in: {}",
            Category::join_labels(&already_voted)
        ));
    }
    if !repeated.is_empty() {
        messages.push(format!(
            "Only one selection is allowed per category: {}",
            Category::join_labels(&repeated)
        ));
    }

    // Every unknown candidate first.
    for selection in selections {
        if catalog.find_candidate(&selection.candidate_id).is_none() {
            messages.push(format!(
                "Candidate {} is not valid",
                selection.display_name()
            ));
        }
    }

    // Then category mismatches among the candidates that do exist.
    for selection in selections {
        if let Some(candidate) = catalog.find_candidate(&selection.candidate_id) {
            if candidate.category != selection.category {
                messages.push(format!(
                    "Candidate {} does not belong to the {} category",
                    selection.display_name(),
                    selection.category.label()
                ));
            }
        }
    }

    messages.into_validation()
}
