//! The user's saved articles and videos.

use serde::{Deserialize, Serialize};

use super::{Article, ContentKind, Engagement, FeedItem, Video};

/// A saved article or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibraryItem {
    /// Saved article.
    Article(Article),
    /// Saved video.
    Video(Video),
}

impl LibraryItem {
    /// Content identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Article(a) => a.id(),
            Self::Video(v) => v.id(),
        }
    }

    /// Kind of the wrapped content.
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Article(_) => ContentKind::Article,
            Self::Video(_) => ContentKind::Video,
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Article(a) => &a.title,
            Self::Video(v) => &v.title,
        }
    }

    /// Per-user state.
    #[must_use]
    pub fn engagement(&self) -> &Engagement {
        match self {
            Self::Article(a) => a.engagement(),
            Self::Video(v) => v.engagement(),
        }
    }

    /// Mutable per-user state.
    pub fn engagement_mut(&mut self) -> &mut Engagement {
        match self {
            Self::Article(a) => a.engagement_mut(),
            Self::Video(v) => v.engagement_mut(),
        }
    }
}

/// Which kinds of content to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    /// Articles and videos.
    #[default]
    All,
    /// Articles only.
    Article,
    /// Videos only.
    Video,
}

impl LibraryKind {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Article => "article",
            Self::Video => "video",
        }
    }
}

/// Library listing filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryFilters {
    /// Content kind.
    pub kind: LibraryKind,
    /// Only unread items.
    pub unread_only: bool,
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for LibraryFilters {
    fn default() -> Self {
        Self {
            kind: LibraryKind::All,
            unread_only: false,
            page: 1,
            per_page: 20,
        }
    }
}

impl LibraryFilters {
    /// Query parameters for the listing endpoint.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = vec![
            ("type".to_string(), self.kind.as_str().to_string()),
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        if self.unread_only {
            q.push(("unread_only".to_string(), "true".to_string()));
        }
        q
    }
}

/// One page of the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryPage {
    /// Saved items.
    pub items: Vec<LibraryItem>,
    /// Total saved items matching the filters.
    pub total: u64,
    /// Unread items matching the filters.
    #[serde(default)]
    pub unread_count: u64,
}

impl LibraryPage {
    /// Removes an item, adjusting `total` and, if it was unread, `unread_count`.
    ///
    /// Returns false if the item was not on this page.
    pub fn remove(&mut self, kind: ContentKind, id: &str) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|item| item.kind() == kind && item.id() == id)
        else {
            return false;
        };
        let item = self.items.remove(pos);
        self.total = self.total.saturating_sub(1);
        if !item.engagement().is_read {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_items_deserialize() {
        let json = r#"{
            "items": [
                {"type": "article", "id": "a1", "title": "A", "url": "u", "score": 10.0,
                 "is_bookmarked": true},
                {"type": "video", "id": "v1", "title": "V", "url": "u", "score": 20.0,
                 "channel": "c", "is_read": true}
            ],
            "total": 2,
            "unread_count": 1
        }"#;
        let page: LibraryPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items[0].kind(), ContentKind::Article);
        assert_eq!(page.items[1].kind(), ContentKind::Video);
        assert!(page.items[1].engagement().is_read);
    }

    #[test]
    fn test_remove_matches_kind_and_id() {
        let json = r#"{
            "items": [
                {"type": "video", "id": "42", "title": "V", "url": "u", "score": 1.0},
                {"type": "article", "id": "42", "title": "A", "url": "u", "score": 1.0,
                 "is_read": true}
            ],
            "total": 2,
            "unread_count": 1
        }"#;
        let mut page: LibraryPage = serde_json::from_str(json).unwrap();

        assert!(page.remove(ContentKind::Article, "42"));

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].kind(), ContentKind::Video);
        assert_eq!(page.total, 1);
        assert_eq!(page.unread_count, 1);
        assert!(!page.remove(ContentKind::Article, "42"));
    }

    #[test]
    fn test_filters_query() {
        let filters = LibraryFilters {
            kind: LibraryKind::Video,
            unread_only: true,
            ..LibraryFilters::default()
        };
        let q = filters.to_query();
        assert!(q.contains(&("type".into(), "video".into())));
        assert!(q.contains(&("unread_only".into(), "true".into())));
    }
}
