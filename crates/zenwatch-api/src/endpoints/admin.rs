//! Admin console: scraping keywords and sources.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{Keyword, KeywordInput, KeywordUpdate, Source, SourceInput, SourceUpdate};

impl ApiClient {
    /// Lists scraping keywords.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_admin_keywords(&self) -> Result<Vec<Keyword>> {
        self.send(ApiRequest::get("api/keywords")).await
    }

    /// Creates a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_admin_keyword(&self, input: &KeywordInput) -> Result<Keyword> {
        self.send(ApiRequest::post("api/keywords").json(input)?)
            .await
    }

    /// Updates a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_admin_keyword(&self, id: i64, update: &KeywordUpdate) -> Result<Keyword> {
        self.send(ApiRequest::patch(format!("api/keywords/{id}")).json(update)?)
            .await
    }

    /// Deletes a scraping keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_admin_keyword(&self, id: i64) -> Result<()> {
        self.send_unit(ApiRequest::delete(format!("api/keywords/{id}")))
            .await
    }

    /// Lists scraping sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_sources(&self) -> Result<Vec<Source>> {
        self.send(ApiRequest::get("api/sources")).await
    }

    /// Creates a scraping source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_source(&self, input: &SourceInput) -> Result<Source> {
        self.send(ApiRequest::post("api/sources").json(input)?)
            .await
    }

    /// Updates a scraping source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update_source(&self, id: i64, update: &SourceUpdate) -> Result<Source> {
        self.send(ApiRequest::patch(format!("api/sources/{id}")).json(update)?)
            .await
    }

    /// Deletes a scraping source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_source(&self, id: i64) -> Result<()> {
        self.send_unit(ApiRequest::delete(format!("api/sources/{id}")))
            .await
    }
}
