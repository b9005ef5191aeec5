use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rocket::{
    form::{self, FromFormField, ValueField},
    request::FromParam,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three disjoint electoral races a vote can belong to.
///
/// The wire representation is the lowercase Spanish name used by the
/// electoral roll; any other value is rejected on deserialization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "presidencial")]
    Presidential,
    #[serde(rename = "distrital")]
    District,
    #[serde(rename = "regional")]
    Regional,
}

impl Category {
    /// Every category, in ballot order.
    pub const ALL: [Category; 3] = [Self::Presidential, Self::District, Self::Regional];

    /// The identifier used on the wire and in URIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presidential => "presidencial",
            Self::District => "distrital",
            Self::Regional => "regional",
        }
    }

    /// Human-readable label, as shown to voters.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Presidential => "Presidencial",
            Self::District => "Distrital",
            Self::Regional => "Regional",
        }
    }

    /// Comma-separated labels, e.g. `Presidencial, Regional`.
    pub fn join_labels(categories: &[Category]) -> String {
        categories
            .iter()
            .map(Category::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category '{0}'")]
pub struct CategoryError(pub String);

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

impl<'a> FromParam<'a> for Category {
    type Error = CategoryError;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

#[rocket::async_trait]
impl<'r> FromFormField<'r> for Category {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        field
            .value
            .parse()
            .map_err(|err: CategoryError| form::Error::validation(err.to_string()).into())
    }
}
