//! Admin-managed scraping keywords and sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A global keyword the scraper tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Identifier.
    pub id: i64,
    /// The keyword.
    pub name: String,
    /// Category it feeds.
    #[serde(default)]
    pub category: Option<String>,
    /// Whether the scraper uses it.
    #[serde(default = "active")]
    pub is_active: bool,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for creating a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordInput {
    /// The keyword.
    pub name: String,
    /// Category it feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Whether the scraper uses it.
    pub is_active: bool,
}

/// Partial keyword update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordUpdate {
    /// New keyword text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// A site or feed the scraper reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Feed or site URL.
    pub url: String,
    /// Scraper type (e.g., "rss", "hackernews", "youtube").
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    /// Whether the scraper uses it.
    #[serde(default = "active")]
    pub is_active: bool,
    /// Last successful scrape.
    #[serde(default)]
    pub last_scraped_at: Option<DateTime<Utc>>,
}

/// Body for creating a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInput {
    /// Display name.
    pub name: String,
    /// Feed or site URL.
    pub url: String,
    /// Scraper type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Whether the scraper uses it.
    pub is_active: bool,
}

/// Partial source update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

const fn active() -> bool {
    true
}
