use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rocket::request::FromParam;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a national identity number.
pub const VOTER_ID_DIGITS: usize = 8;

/// A voter's national identity number: exactly eight ASCII digits.
///
/// Leading zeros are significant, so this is kept as text rather than an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoterIdError {
    #[error("Voter identifier is missing")]
    Missing,
    #[error("Voter identifier must be exactly {VOTER_ID_DIGITS} digits, got '{0}'")]
    Malformed(String),
}

impl VoterId {
    /// Check the shape of a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, VoterIdError> {
        if raw.is_empty() {
            return Err(VoterIdError::Missing);
        }
        if raw.len() != VOTER_ID_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VoterIdError::Malformed(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of the digit at `index`.
    pub fn digit(&self, index: usize) -> usize {
        // Shape was checked on construction.
        usize::from(self.0.as_bytes()[index] - b'0')
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VoterId {
    type Err = VoterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VoterId {
    type Error = VoterIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VoterId> for String {
    fn from(id: VoterId) -> Self {
        id.0
    }
}

impl<'a> FromParam<'a> for VoterId {
    type Error = VoterIdError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        Self::parse(param)
    }
}
