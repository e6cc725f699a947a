//! Article and video engagement.

use zenwatch_api::types::{
    Article, ContentKind, Engagement, FeedItem, LibraryPage, Paginated, Reaction,
    ReactionResponse, Video,
};

use super::{content_plan, patch_engagement, remove_from_feeds, remove_from_library};
use crate::cache::{QueryCache, keys};
use crate::error::Result;
use crate::mutation::run_optimistic;
use crate::zenwatch::ZenWatch;

impl ZenWatch {
    /// Engagement of `kind`/`id` as currently cached, if it is cached anywhere.
    #[must_use]
    pub fn cached_engagement(&self, kind: ContentKind, id: &str) -> Option<Engagement> {
        match kind {
            ContentKind::Article => find_engagement::<Article>(&self.cache, id),
            ContentKind::Video => find_engagement::<Video>(&self.cache, id),
        }
        .or_else(|| {
            self.cache.find_map::<LibraryPage, _>(&keys::library_all(), |page| {
                page.items
                    .iter()
                    .find(|item| item.kind() == kind && item.id() == id)
                    .map(|item| item.engagement().clone())
            })
        })
    }

    /// Flips the favorite flag. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn toggle_favorite(&self, kind: ContentKind, id: &str) -> Result<bool> {
        let favorite = !self
            .cached_engagement(kind, id)
            .is_some_and(|e| e.is_favorite);
        let plan = content_plan("toggle_favorite", kind, id)
            .on_success(if favorite {
                "Added to favorites"
            } else {
                "Removed from favorites"
            })
            .on_error("Could not update favorites");

        let response = run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| patch_engagement(cache, kind, id, |e| e.is_favorite = favorite),
            self.api.toggle_favorite(kind, id),
        )
        .await?;
        Ok(response.is_favorite)
    }

    /// Saves to or removes from the library. Returns the new state.
    ///
    /// Removing takes the item off every cached library page right away.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn toggle_bookmark(&self, kind: ContentKind, id: &str) -> Result<bool> {
        let bookmarked = !self
            .cached_engagement(kind, id)
            .is_some_and(|e| e.is_bookmarked);
        let plan = content_plan("toggle_bookmark", kind, id)
            .on_success(if bookmarked {
                "Saved to library"
            } else {
                "Removed from library"
            })
            .on_error("Could not update library");

        let response = run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                if !bookmarked {
                    remove_from_library(cache, kind, id);
                }
                patch_engagement(cache, kind, id, |e| e.is_bookmarked = bookmarked);
            },
            self.api.toggle_bookmark(kind, id),
        )
        .await?;
        Ok(response.is_bookmarked)
    }

    /// Hides content from the feeds.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn dismiss(&self, kind: ContentKind, id: &str) -> Result<()> {
        let plan = content_plan("dismiss", kind, id).on_error("Could not dismiss");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                remove_from_feeds(cache, kind, id);
                patch_engagement(cache, kind, id, |e| e.is_dismissed = true);
            },
            self.api.dismiss(kind, id),
        )
        .await
    }

    /// Likes or dislikes. Clicking the active reaction again clears it.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn react(
        &self,
        kind: ContentKind,
        id: &str,
        reaction: Reaction,
    ) -> Result<ReactionResponse> {
        let plan = content_plan("react", kind, id).on_error("Could not save your reaction");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| patch_engagement(cache, kind, id, |e| e.react(reaction)),
            self.api.react(kind, id, reaction),
        )
        .await
    }

    /// Marks content as read, lowering library unread counts.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn mark_read(&self, kind: ContentKind, id: &str) -> Result<()> {
        let plan = content_plan("mark_read", kind, id);
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                mark_read_in_library(cache, kind, id);
                patch_engagement(cache, kind, id, |e| e.is_read = true);
            },
            self.api.mark_read(kind, id),
        )
        .await
    }

    /// Archives saved content: it is marked read and leaves the library.
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn archive(&self, kind: ContentKind, id: &str) -> Result<()> {
        let plan = content_plan("archive", kind, id)
            .on_success("Archived")
            .on_error("Could not archive");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                remove_from_library(cache, kind, id);
                patch_engagement(cache, kind, id, |e| e.is_read = true);
            },
            self.api.archive(kind, id),
        )
        .await
    }

    /// Removes an item from the library (un-bookmarks it).
    ///
    /// # Errors
    ///
    /// Returns the request error after rolling back.
    pub async fn remove_from_library(&self, kind: ContentKind, id: &str) -> Result<()> {
        let plan = content_plan("remove_from_library", kind, id)
            .on_success("Removed from library")
            .on_error("Could not update library");
        run_optimistic(
            &self.cache,
            &self.notifier,
            plan,
            |cache| {
                remove_from_library(cache, kind, id);
                patch_engagement(cache, kind, id, |e| e.is_bookmarked = false);
            },
            self.api.toggle_bookmark(kind, id),
        )
        .await
        .map(|_| ())
    }
}

fn find_engagement<T>(cache: &QueryCache, id: &str) -> Option<Engagement>
where
    T: FeedItem + Clone + Send + Sync + 'static,
{
    cache
        .get::<T>(&keys::item(T::KIND, id))
        .map(|item| item.engagement().clone())
        .or_else(|| {
            cache.find_map::<Paginated<T>, _>(&keys::feed(T::KIND), |page| {
                page.items
                    .iter()
                    .find(|item| item.id() == id)
                    .map(|item| item.engagement().clone())
            })
        })
        .or_else(|| {
            cache.find_map::<Vec<T>, _>(&keys::best_of_week(T::KIND), |items| {
                items
                    .iter()
                    .find(|item| item.id() == id)
                    .map(|item| item.engagement().clone())
            })
        })
}

fn mark_read_in_library(cache: &QueryCache, kind: ContentKind, id: &str) {
    cache.update_matching::<LibraryPage>(&keys::library_all(), |page| {
        let mut newly_read = 0;
        for item in &mut page.items {
            if item.kind() == kind && item.id() == id && !item.engagement().is_read {
                item.engagement_mut().is_read = true;
                newly_read += 1;
            }
        }
        page.unread_count = page.unread_count.saturating_sub(newly_read);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zenwatch_api::types::{ArticleFilters, LibraryFilters, LibraryItem};
    use zenwatch_api::{ApiClient, ClientConfig};

    use super::super::fixtures::{article, library, page, video};
    use super::*;

    fn offline() -> ZenWatch {
        // Nothing listens on port 9; every request fails fast.
        ZenWatch::new(ApiClient::new(ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap())
    }

    #[tokio::test]
    async fn test_failed_favorite_rolls_back_every_copy() {
        let zw = offline();
        let feed_key = keys::articles(&ArticleFilters::default());
        let feed = page(vec![article("a1"), article("a2")]);
        zw.cache.set(feed_key.clone(), feed.clone());
        zw.cache.set(keys::item(ContentKind::Article, "a1"), article("a1"));

        assert!(zw.toggle_favorite(ContentKind::Article, "a1").await.is_err());

        assert_eq!(zw.cache.get::<Paginated<Article>>(&feed_key), Some(feed));
        assert_eq!(
            zw.cache.get::<Article>(&keys::item(ContentKind::Article, "a1")),
            Some(article("a1"))
        );
    }

    #[test]
    fn test_cached_engagement_lookup_order() {
        let zw = offline();
        let mut in_feed = video("v1");
        in_feed.engagement.likes = 3;
        zw.cache.set(keys::videos(&Default::default()), page(vec![in_feed]));
        assert_eq!(zw.cached_engagement(ContentKind::Video, "v1").unwrap().likes, 3);

        let mut single = video("v1");
        single.engagement.likes = 4;
        zw.cache.set(keys::item(ContentKind::Video, "v1"), single);
        assert_eq!(zw.cached_engagement(ContentKind::Video, "v1").unwrap().likes, 4);

        assert!(zw.cached_engagement(ContentKind::Article, "v1").is_none());
    }

    #[test]
    fn test_mark_read_in_library_counts_once() {
        let cache = QueryCache::new();
        let key = keys::library(&LibraryFilters::default());
        cache.set(
            key.clone(),
            library(vec![LibraryItem::Article(article("a1")), LibraryItem::Article(article("a2"))]),
        );

        mark_read_in_library(&cache, ContentKind::Article, "a1");
        mark_read_in_library(&cache, ContentKind::Article, "a1");

        let lib: LibraryPage = cache.get(&key).unwrap();
        assert_eq!(lib.unread_count, 1);
        assert!(lib.items[0].engagement().is_read);
    }
}
