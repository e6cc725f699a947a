//! Personalization keywords of the current user.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{NewUserKeyword, UserKeyword};

impl ApiClient {
    /// Lists the user's keywords.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn my_keywords(&self) -> Result<Vec<UserKeyword>> {
        self.send(ApiRequest::get("api/users/me/keywords")).await
    }

    /// Adds a keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (409 for duplicates).
    pub async fn add_keyword(&self, keyword: &NewUserKeyword) -> Result<UserKeyword> {
        self.send(ApiRequest::post("api/users/me/keywords").json(keyword)?)
            .await
    }

    /// Removes a keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn remove_keyword(&self, id: i64) -> Result<()> {
        self.send_unit(ApiRequest::delete(format!("api/users/me/keywords/{id}")))
            .await
    }
}
