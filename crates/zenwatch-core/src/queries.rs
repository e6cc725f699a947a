//! Cached reads.

use std::future::Future;

use zenwatch_api::ApiClient;
use zenwatch_api::types::{
    Article, ArticleFilters, Comment, ContentKind, Keyword, LibraryFilters, LibraryPage,
    Paginated, PublicProfile, ScrapeRun, ScrapeStats, Source, TriageBatch, User, UserKeyword,
    Video, VideoFilters,
};

use crate::cache::{QueryKey, keys};
use crate::comments::{CommentNode, build_tree};
use crate::error::Result;
use crate::zenwatch::ZenWatch;

/// Articles in the triage queue per batch.
pub const TRIAGE_BATCH_SIZE: u32 = 10;

/// Items in a best-of-week list.
pub const BEST_OF_WEEK_LIMIT: u32 = 10;

/// Runs in scrape history.
pub const SCRAPE_HISTORY_LIMIT: u32 = 20;

impl ZenWatch {
    pub(crate) async fn cached<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(ApiClient) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = zenwatch_api::Result<T>> + Send + 'static,
    {
        let api = self.api.clone();
        Ok(self.cache.fetch(key, move || fetch(api.clone())).await?)
    }

    /// One page of the article feed.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn articles(&self, filters: &ArticleFilters) -> Result<Paginated<Article>> {
        let filters = filters.clone();
        self.cached(keys::articles(&filters), move |api| {
            let filters = filters.clone();
            async move { api.list_articles(&filters).await }
        })
        .await
    }

    /// One page of the video feed.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn videos(&self, filters: &VideoFilters) -> Result<Paginated<Video>> {
        let filters = filters.clone();
        self.cached(keys::videos(&filters), move |api| {
            let filters = filters.clone();
            async move { api.list_videos(&filters).await }
        })
        .await
    }

    /// A single article.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (404 for unknown ids).
    pub async fn article(&self, id: &str) -> Result<Article> {
        let id = id.to_string();
        self.cached(keys::item(ContentKind::Article, &id), move |api| {
            let id = id.clone();
            async move { api.get_article(&id).await }
        })
        .await
    }

    /// A single video.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (404 for unknown ids).
    pub async fn video(&self, id: &str) -> Result<Video> {
        let id = id.to_string();
        self.cached(keys::item(ContentKind::Video, &id), move |api| {
            let id = id.clone();
            async move { api.get_video(&id).await }
        })
        .await
    }

    /// Top articles of the past week.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn best_articles_of_week(&self) -> Result<Vec<Article>> {
        self.cached(keys::best_of_week(ContentKind::Article), |api| async move {
            api.best_of_week(BEST_OF_WEEK_LIMIT).await
        })
        .await
    }

    /// Top videos of the past week.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn best_videos_of_week(&self) -> Result<Vec<Video>> {
        self.cached(keys::best_of_week(ContentKind::Video), |api| async move {
            api.best_videos_of_week(BEST_OF_WEEK_LIMIT).await
        })
        .await
    }

    /// One page of the library.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn library(&self, filters: &LibraryFilters) -> Result<LibraryPage> {
        let filters = filters.clone();
        self.cached(keys::library(&filters), move |api| {
            let filters = filters.clone();
            async move { api.library(&filters).await }
        })
        .await
    }

    /// The current triage batch.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn triage(&self) -> Result<TriageBatch> {
        self.cached(keys::triage(), |api| async move {
            api.triage_batch(TRIAGE_BATCH_SIZE).await
        })
        .await
    }

    /// Flat comment list of one article or video.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn comments(&self, kind: ContentKind, content_id: &str) -> Result<Vec<Comment>> {
        let content_id = content_id.to_string();
        self.cached(keys::comments(kind, &content_id), move |api| {
            let content_id = content_id.clone();
            async move { api.list_comments(kind, &content_id).await }
        })
        .await
    }

    /// Comment thread of one article or video.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn comment_tree(
        &self,
        kind: ContentKind,
        content_id: &str,
    ) -> Result<Vec<CommentNode>> {
        Ok(build_tree(&self.comments(kind, content_id).await?))
    }

    /// The user's personalization keywords.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn my_keywords(&self) -> Result<Vec<UserKeyword>> {
        self.cached(keys::my_keywords(), |api| async move { api.my_keywords().await })
            .await
    }

    /// Admin scraping keywords.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (403 for non-admins).
    pub async fn admin_keywords(&self) -> Result<Vec<Keyword>> {
        self.cached(keys::admin_keywords(), |api| async move {
            api.list_admin_keywords().await
        })
        .await
    }

    /// Admin scraping sources.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (403 for non-admins).
    pub async fn sources(&self) -> Result<Vec<Source>> {
        self.cached(keys::sources(), |api| async move { api.list_sources().await })
            .await
    }

    /// Recent scrape runs.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn scrape_history(&self) -> Result<Vec<ScrapeRun>> {
        self.cached(keys::scrape_history(), |api| async move {
            api.scrape_history(SCRAPE_HISTORY_LIMIT).await
        })
        .await
    }

    /// Scraping totals.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn scrape_stats(&self) -> Result<ScrapeStats> {
        self.cached(keys::scrape_stats(), |api| async move { api.scrape_stats().await })
            .await
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (401 without a session).
    pub async fn me(&self) -> Result<User> {
        self.cached(keys::me(), |api| async move { api.me().await }).await
    }

    /// Someone's public profile.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (404 for unknown users).
    pub async fn public_profile(&self, username: &str) -> Result<PublicProfile> {
        let username = username.to_string();
        self.cached(keys::profile(&username), move |api| {
            let username = username.clone();
            async move { api.public_profile(&username).await }
        })
        .await
    }
}
