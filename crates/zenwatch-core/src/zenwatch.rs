//! Client facade tying the API client, cache and notifier together.

use zenwatch_api::{ApiClient, ClientConfig, TokenStore};

use crate::cache::QueryCache;
use crate::error::Result;
use crate::notify::Notifier;

/// Entry point for front ends.
///
/// Reads go through the query cache, writes through the optimistic
/// mutation protocol. Cheap to clone; clones share everything.
#[derive(Debug, Clone)]
pub struct ZenWatch {
    pub(crate) api: ApiClient,
    pub(crate) cache: QueryCache,
    pub(crate) notifier: Notifier,
}

impl ZenWatch {
    /// Wraps an existing API client with a fresh cache and notifier.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self::with_parts(api, QueryCache::new(), Notifier::new())
    }

    /// Builds a client from configuration and a token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
        Ok(Self::new(ApiClient::with_tokens(config, tokens)?))
    }

    /// Assembles a client from its parts.
    #[must_use]
    pub const fn with_parts(api: ApiClient, cache: QueryCache, notifier: Notifier) -> Self {
        Self { api, cache, notifier }
    }

    /// The API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The query cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The toast notifier.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Token store shared with the API client.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        self.api.tokens()
    }
}
