//! Posting, editing and deleting comments.

use chrono::Utc;
use zenwatch_api::types::{Comment, CommentUpdate, ContentKind, NewComment, User};

use super::temp_id;
use crate::cache::keys;
use crate::error::Result;
use crate::mutation::{MutationPlan, run_optimistic};
use crate::validation::validate_comment;
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Posts a comment or a reply (`parent_id`).
    ///
    /// The comment is appended to the cached thread under a temporary id
    /// and replaced by the server's copy once confirmed.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or the request error after rolling back.
    pub async fn post_comment(
        &self,
        kind: ContentKind,
        content_id: &str,
        parent_id: Option<i64>,
        content: &str,
    ) -> Result<Comment> {
        validate_comment(content)?;
        let request = NewComment {
            content_type: kind,
            content_id: content_id.to_string(),
            parent_id,
            content: content.trim().to_string(),
        };

        let author = self.cache.get::<User>(&keys::me());
        let placeholder = Comment {
            id: temp_id(),
            user_id: author.as_ref().map_or(0, |u| u.id),
            username: author.map(|u| u.username),
            content_type: kind,
            content_id: request.content_id.clone(),
            parent_id,
            content: request.content.clone(),
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        let temp = placeholder.id;
        let key = keys::comments(kind, content_id);
        let plan = MutationPlan::new("post_comment")
            .affects(key.clone())
            .on_error("Could not post comment");

        let created = run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Comment>>(&key, |list| list.push(placeholder));
            },
            self.api.create_comment(&request),
        )
        .await?;

        self.cache.update::<Vec<Comment>>(&key, |list| {
            if let Some(entry) = list.iter_mut().find(|c| c.id == temp) {
                *entry = created.clone();
            }
        });
        Ok(created)
    }

    /// Replaces the text of one of the user's comments.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or the request error after rolling back.
    pub async fn edit_comment(
        &self,
        kind: ContentKind,
        content_id: &str,
        comment_id: i64,
        content: &str,
    ) -> Result<Comment> {
        validate_comment(content)?;
        let update = CommentUpdate {
            content: content.trim().to_string(),
        };
        let key = keys::comments(kind, content_id);
        let plan = MutationPlan::new("edit_comment")
            .affects(key.clone())
            .on_error("Could not edit comment");

        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Comment>>(&key, |list| {
                    if let Some(c) = list.iter_mut().find(|c| c.id == comment_id) {
                        c.content.clone_from(&update.content);
                        c.updated_at = Some(Utc::now());
                    }
                });
            },
            self.api.update_comment(comment_id, &update),
        )
        .await
    }

    /// Soft-deletes a comment. It stays in the thread so replies keep
    /// their parent, but its text is gone.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn delete_comment(
        &self,
        kind: ContentKind,
        content_id: &str,
        comment_id: i64,
    ) -> Result<()> {
        let key = keys::comments(kind, content_id);
        let plan = MutationPlan::new("delete_comment")
            .affects(key.clone())
            .on_success("Comment deleted")
            .on_error("Could not delete comment");

        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                cache.update::<Vec<Comment>>(&key, |list| {
                    if let Some(c) = list.iter_mut().find(|c| c.id == comment_id) {
                        c.is_deleted = true;
                        c.content.clear();
                    }
                });
            },
            self.api.delete_comment(comment_id),
        )
        .await
    }
}
