//! Personalization keywords owned by the current user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A keyword boosting matching content in the user's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserKeyword {
    /// Identifier.
    pub id: i64,
    /// The keyword.
    pub keyword: String,
    /// Boost weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for adding a keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserKeyword {
    /// The keyword.
    pub keyword: String,
    /// Boost weight.
    pub weight: f64,
}

impl NewUserKeyword {
    /// Keyword with the default weight.
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            weight: default_weight(),
        }
    }
}

const fn default_weight() -> f64 {
    1.0
}
