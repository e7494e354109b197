//! Job postings held by the document store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ParseEnumError;

/// Visibility of a job posting. Only open postings are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    #[default]
    Open,
    Closed,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Open => "open",
            PostingStatus::Closed => "closed",
        }
    }

    pub fn is_listed(&self) -> bool {
        matches!(self, PostingStatus::Open)
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PostingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PostingStatus::Open),
            "closed" => Ok(PostingStatus::Closed),
            _ => Err(ParseEnumError::new("posting status", s)),
        }
    }
}

/// A job posting. The company is referenced by name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub company_name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    pub location: String,
    #[validate(range(min = 0))]
    pub salary: i64,
    #[serde(default)]
    pub status: PostingStatus,
}
