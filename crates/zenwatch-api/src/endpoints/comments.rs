//! Comments.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{Comment, CommentUpdate, ContentKind, NewComment};

impl ApiClient {
    /// Lists every comment on an article or video as a flat list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_comments(&self, kind: ContentKind, content_id: &str) -> Result<Vec<Comment>> {
        self.send(ApiRequest::get(format!(
            "api/comments/{}/{content_id}",
            kind.as_str()
        )))
        .await
    }

    /// Posts a comment or reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        self.send(ApiRequest::post("api/comments").json(comment)?)
            .await
    }

    /// Edits a comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_comment(&self, id: i64, update: &CommentUpdate) -> Result<Comment> {
        self.send(ApiRequest::put(format!("api/comments/{id}")).json(update)?)
            .await
    }

    /// Soft-deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_comment(&self, id: i64) -> Result<()> {
        self.send_unit(ApiRequest::delete(format!("api/comments/{id}")))
            .await
    }
}
