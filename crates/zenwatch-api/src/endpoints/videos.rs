//! Video listing.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{Paginated, Video, VideoFilters};

impl ApiClient {
    /// Lists videos matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_videos(&self, filters: &VideoFilters) -> Result<Paginated<Video>> {
        self.send(ApiRequest::get("api/videos").query(filters.to_query()))
            .await
    }

    /// Fetches one video.
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 404, .. }` if the video does not exist.
    pub async fn get_video(&self, id: &str) -> Result<Video> {
        self.send(ApiRequest::get(format!("api/videos/{id}"))).await
    }

    /// Highest-scored videos of the past seven days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn best_videos_of_week(&self, limit: u32) -> Result<Vec<Video>> {
        self.send(
            ApiRequest::get("api/videos/best-of-week")
                .query(vec![("limit".to_string(), limit.to_string())]),
        )
        .await
    }
}
