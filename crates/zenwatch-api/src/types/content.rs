//! Articles, videos and per-user engagement state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of feed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Scraped article.
    Article,
    /// Scraped video.
    Video,
}

impl ContentKind {
    /// Collection path segment (`articles` / `videos`).
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Article => "articles",
            Self::Video => "videos",
        }
    }

    /// Singular name used in query parameters.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
        }
    }
}

/// A user's reaction to a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

/// Per-user state attached to every article and video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Engagement {
    /// Opened by the user.
    #[serde(default)]
    pub is_read: bool,
    /// Marked as favorite.
    #[serde(default)]
    pub is_favorite: bool,
    /// Saved to the library.
    #[serde(default)]
    pub is_bookmarked: bool,
    /// Hidden from the feed.
    #[serde(default)]
    pub is_dismissed: bool,
    /// Like counter.
    #[serde(default)]
    pub likes: u32,
    /// Dislike counter.
    #[serde(default)]
    pub dislikes: u32,
    /// The current user's reaction.
    #[serde(default)]
    pub user_reaction: Option<Reaction>,
}

impl Engagement {
    /// Applies a like/dislike click.
    ///
    /// Clicking the active reaction clears it; clicking the other one switches.
    pub fn react(&mut self, reaction: Reaction) {
        match self.user_reaction {
            Some(current) if current == reaction => {
                self.decrement(current);
                self.user_reaction = None;
            }
            previous => {
                if let Some(previous) = previous {
                    self.decrement(previous);
                }
                match reaction {
                    Reaction::Like => self.likes += 1,
                    Reaction::Dislike => self.dislikes += 1,
                }
                self.user_reaction = Some(reaction);
            }
        }
    }

    fn decrement(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Like => self.likes = self.likes.saturating_sub(1),
            Reaction::Dislike => self.dislikes = self.dislikes.saturating_sub(1),
        }
    }
}

/// Common access to articles and videos.
pub trait FeedItem {
    /// Which kind of content this is.
    const KIND: ContentKind;

    /// Content identifier.
    fn id(&self) -> &str;

    /// Per-user state.
    fn engagement(&self) -> &Engagement;

    /// Mutable per-user state.
    fn engagement_mut(&mut self) -> &mut Engagement;
}

/// A scraped article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Link to the original.
    pub url: String,
    /// Source name (e.g., "Hacker News").
    #[serde(default)]
    pub source: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Relevance score, 0 to 100.
    pub score: f64,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Per-user state.
    #[serde(flatten)]
    pub engagement: Engagement,
}

impl FeedItem for Article {
    const KIND: ContentKind = ContentKind::Article;

    fn id(&self) -> &str {
        &self.id
    }

    fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    fn engagement_mut(&mut self) -> &mut Engagement {
        &mut self.engagement
    }
}

/// A scraped video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Watch URL.
    pub url: String,
    /// Channel name.
    #[serde(default)]
    pub channel: Option<String>,
    /// Thumbnail image.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    /// View count at scrape time.
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Relevance score, 0 to 100.
    pub score: f64,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Per-user state.
    #[serde(flatten)]
    pub engagement: Engagement,
}

impl FeedItem for Video {
    const KIND: ContentKind = ContentKind::Video;

    fn id(&self) -> &str {
        &self.id
    }

    fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    fn engagement_mut(&mut self) -> &mut Engagement {
        &mut self.engagement
    }
}

/// Feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Highest score first.
    #[default]
    Score,
    /// Most recent first.
    Newest,
    /// Most liked first.
    Popular,
}

impl SortOrder {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Newest => "newest",
            Self::Popular => "popular",
        }
    }
}

/// Article listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleFilters {
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Category filter.
    pub category: Option<String>,
    /// Source filter.
    pub source: Option<String>,
    /// Minimum score.
    pub min_score: Option<f64>,
    /// Full-text search.
    pub search: Option<String>,
    /// Tags the article must carry.
    pub tags: Vec<String>,
    /// Only favorites.
    pub favorites_only: bool,
    /// Restrict to the last N days.
    pub days: Option<u32>,
    /// Ordering.
    pub sort: SortOrder,
}

impl Default for ArticleFilters {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            category: None,
            source: None,
            min_score: None,
            search: None,
            tags: Vec::new(),
            favorites_only: false,
            days: None,
            sort: SortOrder::Score,
        }
    }
}

impl ArticleFilters {
    /// Query parameters for the listing endpoint.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("sort_by".to_string(), self.sort.as_str().to_string()),
        ];
        push_opt(&mut q, "category", self.category.as_ref());
        push_opt(&mut q, "source", self.source.as_ref());
        push_opt(&mut q, "min_score", self.min_score.as_ref());
        push_opt(&mut q, "search", self.search.as_ref().filter(|s| !s.trim().is_empty()));
        push_opt(&mut q, "days", self.days.as_ref());
        if !self.tags.is_empty() {
            q.push(("tags".to_string(), self.tags.join(",")));
        }
        if self.favorites_only {
            q.push(("is_favorite".to_string(), "true".to_string()));
        }
        q
    }
}

/// Video listing filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFilters {
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Category filter.
    pub category: Option<String>,
    /// Channel filter.
    pub channel: Option<String>,
    /// Minimum score.
    pub min_score: Option<f64>,
    /// Full-text search.
    pub search: Option<String>,
    /// Ordering.
    pub sort: SortOrder,
}

impl Default for VideoFilters {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            category: None,
            channel: None,
            min_score: None,
            search: None,
            sort: SortOrder::Score,
        }
    }
}

impl VideoFilters {
    /// Query parameters for the listing endpoint.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
            ("sort_by".to_string(), self.sort.as_str().to_string()),
        ];
        push_opt(&mut q, "category", self.category.as_ref());
        push_opt(&mut q, "channel", self.channel.as_ref());
        push_opt(&mut q, "min_score", self.min_score.as_ref());
        push_opt(&mut q, "search", self.search.as_ref().filter(|s| !s.trim().is_empty()));
        q
    }
}

fn push_opt(q: &mut Vec<(String, String)>, key: &str, value: Option<&impl ToString>) {
    if let Some(value) = value {
        q.push((key.to_string(), value.to_string()));
    }
}

/// Response of the favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteResponse {
    /// New favorite state.
    pub is_favorite: bool,
}

/// Response of the bookmark toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkResponse {
    /// New bookmark state.
    pub is_bookmarked: bool,
}

/// Response of like/dislike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionResponse {
    /// Like counter.
    pub likes: u32,
    /// Dislike counter.
    pub dislikes: u32,
    /// The user's reaction after the click.
    pub user_reaction: Option<Reaction>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_article_deserializes_flat_engagement() {
        let json = r#"{
            "id": "a1",
            "title": "Rust 2024",
            "url": "https://example.com",
            "score": 87.5,
            "tags": ["rust", "release"],
            "is_bookmarked": true,
            "likes": 3,
            "user_reaction": "like"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.score, 87.5);
        assert_eq!(article.tags, vec!["rust", "release"]);
        assert!(article.engagement.is_bookmarked);
        assert!(!article.engagement.is_read);
        assert_eq!(article.engagement.user_reaction, Some(Reaction::Like));
    }

    #[test]
    fn test_react_toggles_and_switches() {
        let mut e = Engagement::default();
        e.react(Reaction::Like);
        assert_eq!((e.likes, e.dislikes, e.user_reaction), (1, 0, Some(Reaction::Like)));

        e.react(Reaction::Dislike);
        assert_eq!((e.likes, e.dislikes, e.user_reaction), (0, 1, Some(Reaction::Dislike)));

        e.react(Reaction::Dislike);
        assert_eq!((e.likes, e.dislikes, e.user_reaction), (0, 0, None));
    }

    #[test]
    fn test_article_filters_query() {
        let filters = ArticleFilters {
            category: Some("ai".into()),
            min_score: Some(50.0),
            search: Some("   ".into()),
            tags: vec!["llm".into(), "rust".into()],
            favorites_only: true,
            ..ArticleFilters::default()
        };
        let q = filters.to_query();
        assert!(q.contains(&("category".into(), "ai".into())));
        assert!(q.contains(&("min_score".into(), "50".into())));
        assert!(q.contains(&("tags".into(), "llm,rust".into())));
        assert!(q.contains(&("is_favorite".into(), "true".into())));
        assert!(!q.iter().any(|(k, _)| k == "search"));
    }

    #[test]
    fn test_content_kind_paths() {
        assert_eq!(ContentKind::Article.collection(), "articles");
        assert_eq!(ContentKind::Video.as_str(), "video");
        assert_eq!(serde_json::to_string(&ContentKind::Video).unwrap(), "\"video\"");
    }
}
