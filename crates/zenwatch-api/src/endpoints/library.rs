//! Library listing.

use crate::client::{ApiClient, ApiRequest};
use crate::error::Result;
use crate::types::{LibraryFilters, LibraryPage};

impl ApiClient {
    /// Lists the user's saved articles and videos.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn library(&self, filters: &LibraryFilters) -> Result<LibraryPage> {
        self.send(ApiRequest::get("api/library").query(filters.to_query()))
            .await
    }
}
