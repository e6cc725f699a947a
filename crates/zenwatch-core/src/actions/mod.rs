//! User actions.
//!
//! Every action that changes server state is an optimistic mutation (see
//! [`crate::mutation`]): the cache is rewritten first, the request is sent,
//! and the rewrite is rolled back if the request fails.
//!
//! An article or video can be cached in several places at once (feed
//! pages, its own entry, best-of-week, library pages, the triage batch);
//! the helpers here keep all of them in step.

mod account;
mod admin;
mod comments;
mod content;
mod keywords;
mod scrape;
mod triage;

use std::sync::atomic::{AtomicI64, Ordering};

use zenwatch_api::types::{
    Article, ContentKind, Engagement, FeedItem, LibraryPage, Paginated, TriageBatch, Video,
};

use crate::cache::{QueryCache, keys};
use crate::mutation::MutationPlan;

static NEXT_TEMP_ID: AtomicI64 = AtomicI64::new(-1);

/// Placeholder id for an optimistically created entity.
///
/// Negative so it never collides with a server id.
pub(crate) fn temp_id() -> i64 {
    NEXT_TEMP_ID.fetch_sub(1, Ordering::Relaxed)
}

/// Plan touching every place one piece of content can be cached.
pub(crate) fn content_plan(name: &'static str, kind: ContentKind, id: &str) -> MutationPlan {
    let plan = MutationPlan::new(name)
        .affects(keys::feed(kind))
        .affects(keys::item(kind, id))
        .affects(keys::best_of_week(kind))
        .affects(keys::library_all());
    match kind {
        ContentKind::Article => plan.affects(keys::triage()),
        ContentKind::Video => plan,
    }
}

/// Applies `f` to the engagement of every cached copy of `kind`/`id`.
pub(crate) fn patch_engagement(
    cache: &QueryCache,
    kind: ContentKind,
    id: &str,
    f: impl Fn(&mut Engagement),
) {
    match kind {
        ContentKind::Article => {
            patch_items::<Article>(cache, id, &f);
            cache.update::<TriageBatch>(&keys::triage(), |batch| {
                batch
                    .articles
                    .iter_mut()
                    .filter(|a| a.id == id)
                    .for_each(|a| f(&mut a.engagement));
            });
        }
        ContentKind::Video => patch_items::<Video>(cache, id, &f),
    }
    cache.update_matching::<LibraryPage>(&keys::library_all(), |page| {
        page.items
            .iter_mut()
            .filter(|item| item.kind() == kind && item.id() == id)
            .for_each(|item| f(item.engagement_mut()));
    });
}

fn patch_items<T>(cache: &QueryCache, id: &str, f: &impl Fn(&mut Engagement))
where
    T: FeedItem + Clone + Send + Sync + 'static,
{
    cache.update_matching::<Paginated<T>>(&keys::feed(T::KIND), |page| {
        page.items
            .iter_mut()
            .filter(|item| item.id() == id)
            .for_each(|item| f(item.engagement_mut()));
    });
    cache.update::<T>(&keys::item(T::KIND, id), |item| f(item.engagement_mut()));
    cache.update_matching::<Vec<T>>(&keys::best_of_week(T::KIND), |items| {
        items
            .iter_mut()
            .filter(|item| item.id() == id)
            .for_each(|item| f(item.engagement_mut()));
    });
}

/// Drops `kind`/`id` from feed pages, best-of-week and the triage batch.
pub(crate) fn remove_from_feeds(cache: &QueryCache, kind: ContentKind, id: &str) {
    match kind {
        ContentKind::Article => {
            remove_items::<Article>(cache, id);
            cache.update::<TriageBatch>(&keys::triage(), |batch| {
                batch.take(id);
            });
        }
        ContentKind::Video => remove_items::<Video>(cache, id),
    }
}

fn remove_items<T>(cache: &QueryCache, id: &str)
where
    T: FeedItem + Clone + Send + Sync + 'static,
{
    cache.update_matching::<Paginated<T>>(&keys::feed(T::KIND), |page| {
        page.remove_where(|item| item.id() == id);
    });
    cache.update_matching::<Vec<T>>(&keys::best_of_week(T::KIND), |items| {
        items.retain(|item| item.id() != id);
    });
}

/// Drops `kind`/`id` from every library page, adjusting its counters.
pub(crate) fn remove_from_library(cache: &QueryCache, kind: ContentKind, id: &str) {
    cache.update_matching::<LibraryPage>(&keys::library_all(), |page| {
        page.remove(kind, id);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use zenwatch_api::types::{Article, Engagement, LibraryItem, LibraryPage, Paginated, Video};

    pub fn article(id: &str) -> Article {
        Article {
            id: id.into(),
            title: format!("Article {id}"),
            url: format!("https://example.com/{id}"),
            source: Some("Hacker News".into()),
            summary: None,
            score: 80.0,
            category: Some("ai".into()),
            tags: vec!["rust".into()],
            published_at: None,
            engagement: Engagement::default(),
        }
    }

    pub fn video(id: &str) -> Video {
        Video {
            id: id.into(),
            title: format!("Video {id}"),
            url: format!("https://youtube.com/watch?v={id}"),
            channel: Some("RustConf".into()),
            thumbnail_url: None,
            duration_seconds: Some(600),
            view_count: None,
            score: 70.0,
            category: None,
            tags: Vec::new(),
            published_at: None,
            engagement: Engagement::default(),
        }
    }

    pub fn page<T>(items: Vec<T>) -> Paginated<T> {
        let total = items.len() as u64;
        Paginated {
            items,
            total,
            page: 1,
            per_page: 20,
            pages: 1,
        }
    }

    pub fn library(items: Vec<LibraryItem>) -> LibraryPage {
        let unread_count = items.iter().filter(|i| !i.engagement().is_read).count() as u64;
        LibraryPage {
            total: items.len() as u64,
            items,
            unread_count,
        }
    }
}
