//! Triage queue.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::TriageBatch;

impl ApiClient {
    /// Fetches the next batch of unseen articles.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn triage_batch(&self, limit: u32) -> Result<TriageBatch> {
        self.send(
            ApiRequest::get("api/triage").query(vec![("limit".to_string(), limit.to_string())]),
        )
        .await
    }

    /// Rejects an article (swipe left).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn triage_dismiss(&self, article_id: &str) -> Result<()> {
        self.send_unit(ApiRequest::post(format!("api/triage/{article_id}/dismiss")))
            .await
    }

    /// Keeps an article in the library (swipe right).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn triage_bookmark(&self, article_id: &str) -> Result<()> {
        self.send_unit(ApiRequest::post(format!("api/triage/{article_id}/bookmark")))
            .await
    }
}
