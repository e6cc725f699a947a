//! Per-user actions shared by articles and videos.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{BookmarkResponse, ContentKind, FavoriteResponse, Reaction, ReactionResponse};

fn action_path(kind: ContentKind, id: &str, action: &str) -> String {
    format!("api/{}/{id}/{action}", kind.collection())
}

impl ApiClient {
    /// Toggles the favorite flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn toggle_favorite(&self, kind: ContentKind, id: &str) -> Result<FavoriteResponse> {
        self.send(ApiRequest::post(action_path(kind, id, "favorite")))
            .await
    }

    /// Toggles the bookmark (library) flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn toggle_bookmark(&self, kind: ContentKind, id: &str) -> Result<BookmarkResponse> {
        self.send(ApiRequest::post(action_path(kind, id, "bookmark")))
            .await
    }

    /// Sends a like or dislike click.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn react(
        &self,
        kind: ContentKind,
        id: &str,
        reaction: Reaction,
    ) -> Result<ReactionResponse> {
        let action = match reaction {
            Reaction::Like => "like",
            Reaction::Dislike => "dislike",
        };
        self.send(ApiRequest::post(action_path(kind, id, action)))
            .await
    }

    /// Marks content as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn mark_read(&self, kind: ContentKind, id: &str) -> Result<()> {
        self.send_unit(ApiRequest::post(action_path(kind, id, "read")))
            .await
    }

    /// Archives content.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn archive(&self, kind: ContentKind, id: &str) -> Result<()> {
        self.send_unit(ApiRequest::post(action_path(kind, id, "archive")))
            .await
    }

    /// Hides content from the feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn dismiss(&self, kind: ContentKind, id: &str) -> Result<()> {
        self.send_unit(ApiRequest::post(action_path(kind, id, "dismiss")))
            .await
    }
}
