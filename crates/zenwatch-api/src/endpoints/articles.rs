//! Article listing.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{Article, ArticleFilters, Paginated};

impl ApiClient {
    /// Lists articles matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_articles(&self, filters: &ArticleFilters) -> Result<Paginated<Article>> {
        self.send(ApiRequest::get("api/articles").query(filters.to_query()))
            .await
    }

    /// Fetches one article.
    ///
    /// # Errors
    ///
    /// Returns `Status { status: 404, .. }` if the article does not exist.
    pub async fn get_article(&self, id: &str) -> Result<Article> {
        self.send(ApiRequest::get(format!("api/articles/{id}"))).await
    }

    /// Highest-scored articles of the past seven days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn best_of_week(&self, limit: u32) -> Result<Vec<Article>> {
        self.send(
            ApiRequest::get("api/articles/best-of-week")
                .query(vec![("limit".to_string(), limit.to_string())]),
        )
        .await
    }
}
