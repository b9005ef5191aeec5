mod category;
mod voter_id;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use category::{Category, CategoryError};
pub use voter_id::{VoterId, VoterIdError, VOTER_ID_DIGITS};

/// Our candidate IDs are short strings such as `pres-1`.
pub type CandidateId = String;

/// Store-assigned vote identifier. These increase monotonically in commit order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteId(pub u64);

impl Display for VoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "vote-{}", self.0)
    }
}
