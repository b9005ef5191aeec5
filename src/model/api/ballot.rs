use serde::{Deserialize, Serialize};

use crate::model::{
    common::Category,
    vote::{Selection, Vote},
};

/// A batch of selections a voter wishes to confirm together.
///
/// The voter ID is kept as raw text: checking its shape is part of validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotRequest {
    pub voter_id: String,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// Result of validating a batch: `{"ok": true}` or `{"ok": false, "errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn accepted() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self { ok: false, errors }
    }
}

/// Confirmation returned once a batch has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastReceipt {
    /// Human-readable confirmation naming the categories voted in.
    pub message: String,
    /// The committed votes, in the order the selections were submitted.
    pub votes: Vec<Vote>,
}

impl CastReceipt {
    pub fn new(votes: Vec<Vote>) -> Self {
        let categories: Vec<Category> = votes.iter().map(|vote| vote.category).collect();
        Self {
            message: format!(
                "Votes recorded in: {}",
                Category::join_labels(&categories)
            ),
            votes,
        }
    }
}
