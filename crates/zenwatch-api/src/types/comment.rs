//! Comments on articles and videos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentKind;

/// A comment as stored by the backend.
///
/// Replies point at their parent through `parent_id`; the flat list is
/// turned into a tree client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Identifier.
    pub id: i64,
    /// Author.
    pub user_id: i64,
    /// Author's username, when the backend includes it.
    #[serde(default)]
    pub username: Option<String>,
    /// What the comment is attached to.
    pub content_type: ContentKind,
    /// Identifier of the article or video.
    pub content_id: String,
    /// Parent comment for replies.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Body text.
    pub content: String,
    /// Soft-delete flag; deleted comments keep their place in the tree.
    #[serde(default)]
    pub is_deleted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a new comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// What the comment is attached to.
    pub content_type: ContentKind,
    /// Identifier of the article or video.
    pub content_id: String,
    /// Parent comment when replying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Body text.
    pub content: String,
}

/// Body of a comment edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUpdate {
    /// New body text.
    pub content: String,
}
