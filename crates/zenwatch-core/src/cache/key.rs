//! Cache keys.

use std::fmt;

use serde::Serialize;

/// Hierarchical cache key: a name followed by parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a key with a single segment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Appends a segment.
    #[must_use]
    pub fn with(mut self, part: impl Into<String>) -> Self {
        self.0.push(part.into());
        self
    }

    /// Appends serialized parameters (e.g. a filter struct).
    #[must_use]
    pub fn with_params<T: Serialize>(self, params: &T) -> Self {
        let encoded = serde_json::to_string(params).unwrap_or_default();
        self.with(encoded)
    }

    /// Segments of this key.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Returns true if `prefix` addresses this key.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Keys used by the client.
///
/// Functions without parameters return prefixes that address every
/// parameterized variant.
pub mod keys {
    use zenwatch_api::types::{ArticleFilters, ContentKind, LibraryFilters, VideoFilters};

    use super::QueryKey;

    /// Every feed listing of `kind` (`articles` / `videos`).
    #[must_use]
    pub fn feed(kind: ContentKind) -> QueryKey {
        QueryKey::new(kind.collection())
    }

    /// One article listing.
    #[must_use]
    pub fn articles(filters: &ArticleFilters) -> QueryKey {
        feed(ContentKind::Article).with_params(filters)
    }

    /// One video listing.
    #[must_use]
    pub fn videos(filters: &VideoFilters) -> QueryKey {
        feed(ContentKind::Video).with_params(filters)
    }

    /// A single article or video.
    #[must_use]
    pub fn item(kind: ContentKind, id: &str) -> QueryKey {
        QueryKey::new(kind.as_str()).with(id)
    }

    /// Best-of-week list of `kind`.
    #[must_use]
    pub fn best_of_week(kind: ContentKind) -> QueryKey {
        QueryKey::new("best-of-week").with(kind.as_str())
    }

    /// Every library listing.
    #[must_use]
    pub fn library_all() -> QueryKey {
        QueryKey::new("library")
    }

    /// One library listing.
    #[must_use]
    pub fn library(filters: &LibraryFilters) -> QueryKey {
        library_all().with_params(filters)
    }

    /// The triage batch.
    #[must_use]
    pub fn triage() -> QueryKey {
        QueryKey::new("triage")
    }

    /// Comments on one article or video.
    #[must_use]
    pub fn comments(kind: ContentKind, content_id: &str) -> QueryKey {
        QueryKey::new("comments").with(kind.as_str()).with(content_id)
    }

    /// The user's personalization keywords.
    #[must_use]
    pub fn my_keywords() -> QueryKey {
        QueryKey::new("user-keywords")
    }

    /// Admin scraping keywords.
    #[must_use]
    pub fn admin_keywords() -> QueryKey {
        QueryKey::new("admin").with("keywords")
    }

    /// Admin scraping sources.
    #[must_use]
    pub fn sources() -> QueryKey {
        QueryKey::new("admin").with("sources")
    }

    /// Everything scraping related.
    #[must_use]
    pub fn scraping() -> QueryKey {
        QueryKey::new("scraping")
    }

    /// Scrape history.
    #[must_use]
    pub fn scrape_history() -> QueryKey {
        scraping().with("history")
    }

    /// Scrape statistics.
    #[must_use]
    pub fn scrape_stats() -> QueryKey {
        scraping().with("stats")
    }

    /// A public profile.
    #[must_use]
    pub fn profile(username: &str) -> QueryKey {
        QueryKey::new("profile").with(username)
    }

    /// The signed-in user.
    #[must_use]
    pub fn me() -> QueryKey {
        QueryKey::new("auth").with("me")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenwatch_api::types::{ArticleFilters, ContentKind};

    #[test]
    fn test_prefix_matching() {
        let listing = keys::articles(&ArticleFilters::default());
        assert!(listing.starts_with(&keys::feed(ContentKind::Article)));
        assert!(!listing.starts_with(&keys::feed(ContentKind::Video)));
        let item = keys::item(ContentKind::Article, "a1");
        assert!(!item.starts_with(&keys::feed(ContentKind::Article)));
        assert!(keys::scrape_stats().starts_with(&keys::scraping()));
    }

    #[test]
    fn test_params_distinguish_keys() {
        let first = keys::articles(&ArticleFilters::default());
        let second = keys::articles(&ArticleFilters {
            page: 2,
            ..ArticleFilters::default()
        });
        assert_ne!(first, second);
        assert_eq!(first, keys::articles(&ArticleFilters::default()));
    }

    #[test]
    fn test_display() {
        assert_eq!(keys::comments(ContentKind::Video, "v1").to_string(), "comments/video/v1");
    }
}
