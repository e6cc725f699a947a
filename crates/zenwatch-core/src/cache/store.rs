//! Query cache storage and fetch coordination.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::QueryKey;

/// How long a fetched value is served without refetching.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);

type AnyValue = Arc<dyn Any + Send + Sync>;
type FetchResult = std::result::Result<AnyValue, QueryError>;
type BoxFuture = Pin<Box<dyn Future<Output = FetchResult> + Send>>;
type Refetcher = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

/// Failure of a cached query.
///
/// Cloneable so one failure can be handed to every caller that joined the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The fetcher failed.
    #[error("{message}")]
    Fetch {
        /// HTTP status, if the server answered.
        status: Option<u16>,
        /// Error text.
        message: String,
    },

    /// The fetch was cancelled by an optimistic mutation.
    #[error("Query cancelled")]
    Cancelled,

    /// The cached value has a different type than requested.
    #[error("Cached value for {0} has an unexpected type")]
    TypeMismatch(String),
}

impl From<zenwatch_api::Error> for QueryError {
    fn from(e: zenwatch_api::Error) -> Self {
        Self::Fetch {
            status: e.status(),
            message: e.to_string(),
        }
    }
}

/// Observable state of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryState {
    /// A value is cached.
    pub has_value: bool,
    /// The value is older than the stale time or was invalidated.
    pub is_stale: bool,
    /// A fetch is in flight.
    pub is_fetching: bool,
}

/// Values captured before an optimistic update.
#[derive(Clone, Default)]
pub struct Snapshot {
    entries: Vec<(QueryKey, Option<AnyValue>)>,
}

impl Snapshot {
    /// Keys captured by this snapshot.
    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

struct InFlight {
    id: u64,
    rx: watch::Receiver<Option<FetchResult>>,
}

#[derive(Default)]
struct Entry {
    value: Option<AnyValue>,
    updated_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<InFlight>,
    refetch: Option<Refetcher>,
}

impl Entry {
    fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated
            || self
                .updated_at
                .is_none_or(|at| at.elapsed() >= stale_time)
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    stale_time: Duration,
    next_id: AtomicU64,
}

/// Keyed store of query results.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.lock().len())
            .field("stale_time", &self.inner.stale_time)
            .finish()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

enum Plan {
    Fresh(AnyValue),
    Join(watch::Receiver<Option<FetchResult>>),
    Lead(watch::Sender<Option<FetchResult>>, u64),
}

/// Clears the in-flight marker if the leading fetch is dropped mid-way.
struct InFlightGuard {
    cache: QueryCache,
    key: QueryKey,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut entries = self.cache.lock();
        if let Some(entry) = entries.get_mut(&self.key)
            && entry.in_flight.as_ref().is_some_and(|f| f.id == self.id)
        {
            entry.in_flight = None;
        }
    }
}

impl QueryCache {
    /// Creates an empty cache with [`DEFAULT_STALE_TIME`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_stale_time(DEFAULT_STALE_TIME)
    }

    /// Creates an empty cache with a custom stale time.
    #[must_use]
    pub fn with_stale_time(stale_time: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                stale_time,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached value for `key`, fresh or stale.
    #[must_use]
    pub fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let value = self.lock().get(key)?.value.clone()?;
        value.downcast::<T>().ok().map(|v| (*v).clone())
    }

    /// Stores a value, marking it fresh.
    pub fn set<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let mut entries = self.lock();
        let entry = entries.entry(key).or_default();
        entry.value = Some(Arc::new(value));
        entry.updated_at = Some(Instant::now());
        entry.invalidated = false;
    }

    /// Rewrites the cached value for `key` in place.
    ///
    /// Returns false if nothing of type `T` is cached there.
    pub fn update<T>(&self, key: &QueryKey, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        let Some(mut value) = typed_value::<T>(entry) else {
            return false;
        };
        f(&mut value);
        entry.value = Some(Arc::new(value));
        true
    }

    /// Rewrites every cached value of type `T` under `prefix`.
    ///
    /// Entries holding other types are left alone. Returns the number of
    /// entries touched.
    pub fn update_matching<T>(&self, prefix: &QueryKey, mut f: impl FnMut(&mut T)) -> usize
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut entries = self.lock();
        let mut touched = 0;
        for (key, entry) in entries.iter_mut() {
            if !key.starts_with(prefix) {
                continue;
            }
            if let Some(mut value) = typed_value::<T>(entry) {
                f(&mut value);
                entry.value = Some(Arc::new(value));
                touched += 1;
            }
        }
        touched
    }

    /// Returns the first `Some` produced by `f` over cached values of type
    /// `T` under `prefix`, visiting keys in order.
    pub fn find_map<T, R>(&self, prefix: &QueryKey, mut f: impl FnMut(&T) -> Option<R>) -> Option<R>
    where
        T: Send + Sync + 'static,
    {
        let entries = self.lock();
        let mut keys: Vec<&QueryKey> = entries.keys().filter(|k| k.starts_with(prefix)).collect();
        keys.sort();
        keys.into_iter().find_map(|key| {
            let value = entries.get(key)?.value.as_ref()?;
            f(value.downcast_ref::<T>()?)
        })
    }

    /// Cancels in-flight fetches under `prefix`.
    ///
    /// The cancelled fetches finish with [`QueryError::Cancelled`] and their
    /// results are discarded, so they cannot overwrite an optimistic update.
    pub fn cancel(&self, prefix: &QueryKey) {
        let mut entries = self.lock();
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) && entry.in_flight.take().is_some() {
                debug!(%key, "Cancelled in-flight query");
            }
        }
    }

    /// Captures the current values under each prefix.
    #[must_use]
    pub fn snapshot(&self, prefixes: &[QueryKey]) -> Snapshot {
        let entries = self.lock();
        let mut captured: Vec<_> = entries
            .iter()
            .filter(|(key, _)| prefixes.iter().any(|p| key.starts_with(p)))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        captured.sort_by(|a, b| a.0.cmp(&b.0));
        Snapshot { entries: captured }
    }

    /// Puts captured values back.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut entries = self.lock();
        for (key, value) in snapshot.entries {
            trace!(%key, "Restoring snapshot entry");
            entries.entry(key).or_default().value = value;
        }
    }

    /// Marks everything under `prefix` stale.
    ///
    /// Entries that were fetched through [`fetch`](Self::fetch) are refetched
    /// in the background; readers keep seeing the previous value until the
    /// refetch lands.
    pub fn invalidate(&self, prefix: &QueryKey) {
        let refetches: Vec<(QueryKey, Refetcher)> = {
            let mut entries = self.lock();
            entries
                .iter_mut()
                .filter(|(key, _)| key.starts_with(prefix))
                .filter_map(|(key, entry)| {
                    entry.invalidated = true;
                    if entry.in_flight.is_some() || entry.value.is_none() {
                        return None;
                    }
                    entry.refetch.clone().map(|r| (key.clone(), r))
                })
                .collect()
        };

        debug!(%prefix, refetching = refetches.len(), "Invalidated queries");

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        for (key, refetch) in refetches {
            let Plan::Lead(tx, id) = self.plan(&key, false) else {
                continue;
            };
            let cache = self.clone();
            handle.spawn(async move {
                let _guard = InFlightGuard {
                    cache: cache.clone(),
                    key: key.clone(),
                    id,
                };
                let result = refetch().await;
                cache.finish(&key, id, &tx, result);
            });
        }
    }

    /// Drops one entry.
    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    /// Drops every entry (e.g. on logout).
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Inspects an entry.
    #[must_use]
    pub fn state(&self, key: &QueryKey) -> EntryState {
        self.lock()
            .get(key)
            .map(|entry| EntryState {
                has_value: entry.value.is_some(),
                is_stale: entry.is_stale(self.inner.stale_time),
                is_fetching: entry.in_flight.is_some(),
            })
            .unwrap_or_default()
    }

    /// Returns true if `key` needs a refetch.
    #[must_use]
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let state = self.state(key);
        !state.has_value || state.is_stale
    }

    /// Returns the value for `key`, fetching it if missing or stale.
    ///
    /// Concurrent calls for the same key share one fetch. Failures are not
    /// cached; a previously cached value is kept.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, [`QueryError::Cancelled`] if the fetch was
    /// cancelled, or [`QueryError::TypeMismatch`].
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, QueryError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = zenwatch_api::Result<T>> + Send + 'static,
    {
        let refetch: Refetcher = Arc::new(move || {
            let fut = fetcher();
            Box::pin(async move {
                fut.await
                    .map(|value| Arc::new(value) as AnyValue)
                    .map_err(QueryError::from)
            }) as BoxFuture
        });
        self.lock().entry(key.clone()).or_default().refetch = Some(Arc::clone(&refetch));

        let result = match self.plan(&key, true) {
            Plan::Fresh(value) => Ok(value),
            Plan::Join(mut rx) => {
                trace!(%key, "Joining in-flight query");
                match rx.wait_for(Option::is_some).await {
                    Ok(done) => (*done).clone().unwrap_or(Err(QueryError::Cancelled)),
                    Err(_) => Err(QueryError::Cancelled),
                }
            }
            Plan::Lead(tx, id) => {
                debug!(%key, "Fetching query");
                let _guard = InFlightGuard {
                    cache: self.clone(),
                    key: key.clone(),
                    id,
                };
                let result = refetch().await;
                self.finish(&key, id, &tx, result)
            }
        };

        result?
            .downcast::<T>()
            .map(|v| (*v).clone())
            .map_err(|_| QueryError::TypeMismatch(key.to_string()))
    }

    fn plan(&self, key: &QueryKey, serve_fresh: bool) -> Plan {
        let mut entries = self.lock();
        let entry = entries.entry(key.clone()).or_default();

        if serve_fresh
            && !entry.is_stale(self.inner.stale_time)
            && let Some(value) = &entry.value
        {
            return Plan::Fresh(Arc::clone(value));
        }
        if let Some(in_flight) = &entry.in_flight {
            return Plan::Join(in_flight.rx.clone());
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(None);
        entry.in_flight = Some(InFlight { id, rx });
        Plan::Lead(tx, id)
    }

    fn finish(
        &self,
        key: &QueryKey,
        id: u64,
        tx: &watch::Sender<Option<FetchResult>>,
        result: FetchResult,
    ) -> FetchResult {
        let result = {
            let mut entries = self.lock();
            match entries.get_mut(key) {
                Some(entry) if entry.in_flight.as_ref().is_some_and(|f| f.id == id) => {
                    entry.in_flight = None;
                    if let Ok(value) = &result {
                        entry.value = Some(Arc::clone(value));
                        entry.updated_at = Some(Instant::now());
                        entry.invalidated = false;
                    }
                    result
                }
                _ => {
                    debug!(%key, "Discarding result of cancelled query");
                    Err(QueryError::Cancelled)
                }
            }
        };
        tx.send_replace(Some(result.clone()));
        result
    }
}

fn typed_value<T>(entry: &Entry) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    let value = entry.value.as_ref()?;
    value.downcast_ref::<T>().cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counting_fetcher(
        calls: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> impl Fn() -> Pin<Box<dyn Future<Output = zenwatch_api::Result<u32>> + Send>>
    + Send
    + Sync
    + 'static {
        let calls = Arc::clone(calls);
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                Ok(u32::try_from(n).unwrap())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_value_is_served_without_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("n");

        assert_eq!(cache.fetch(key.clone(), counting_fetcher(&calls, Duration::ZERO)).await, Ok(1));
        assert_eq!(cache.fetch(key.clone(), counting_fetcher(&calls, Duration::ZERO)).await, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(DEFAULT_STALE_TIME).await;
        assert!(cache.is_stale(&key));
        assert_eq!(cache.fetch(key, counting_fetcher(&calls, Duration::ZERO)).await, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_share_one_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("n");

        let (a, b) = tokio::join!(
            cache.fetch(key.clone(), counting_fetcher(&calls, Duration::from_millis(50))),
            cache.fetch(key.clone(), counting_fetcher(&calls, Duration::from_millis(50))),
        );

        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_fetch_does_not_write() {
        let cache = QueryCache::new();
        let key = QueryKey::new("list");

        let pending = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .fetch(key, || async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(vec![9])
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(cache.state(&key).is_fetching);

        cache.cancel(&key);
        cache.set(key.clone(), vec![1, 3]);

        assert_eq!(pending.await.unwrap(), Err(QueryError::Cancelled));
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 3]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_refetches_and_keeps_old_value_meanwhile() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("feed").with("p1");

        cache
            .fetch(key.clone(), counting_fetcher(&calls, Duration::from_millis(10)))
            .await
            .unwrap();

        cache.invalidate(&QueryKey::new("feed"));
        tokio::task::yield_now().await;
        assert!(cache.state(&key).is_fetching);
        assert_eq!(cache.get::<u32>(&key), Some(1));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get::<u32>(&key), Some(2));
        assert!(!cache.is_stale(&key));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_value() {
        let cache = QueryCache::with_stale_time(Duration::ZERO);
        let key = QueryKey::new("n");
        cache.set(key.clone(), 7_u32);

        let err = cache
            .fetch(key.clone(), || async {
                Err::<u32, _>(zenwatch_api::Error::Status {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Fetch { status: Some(500), .. }));
        assert_eq!(cache.get::<u32>(&key), Some(7));
        assert!(!cache.state(&key).is_fetching);
    }

    #[test]
    fn test_snapshot_restore() {
        let cache = QueryCache::new();
        let a = QueryKey::new("articles").with("p1");
        let b = QueryKey::new("articles").with("p2");
        let other = QueryKey::new("videos");
        cache.set(a.clone(), vec![1, 2]);
        cache.set(b.clone(), vec![3]);
        cache.set(other.clone(), vec![4]);

        let snapshot = cache.snapshot(&[QueryKey::new("articles")]);
        assert_eq!(snapshot.len(), 2);

        let touched = cache.update_matching::<Vec<i32>>(&QueryKey::new("articles"), |v| v.clear());
        assert_eq!(touched, 2);
        cache.update::<Vec<i32>>(&other, |v| v.push(5));

        cache.restore(snapshot);
        assert_eq!(cache.get::<Vec<i32>>(&a), Some(vec![1, 2]));
        assert_eq!(cache.get::<Vec<i32>>(&b), Some(vec![3]));
        assert_eq!(cache.get::<Vec<i32>>(&other), Some(vec![4, 5]));
    }

    #[test]
    fn test_update_ignores_other_types() {
        let cache = QueryCache::new();
        let key = QueryKey::new("x");
        cache.set(key.clone(), "text".to_string());
        assert!(!cache.update::<u32>(&key, |n| *n += 1));
        assert_eq!(cache.get::<u32>(&key), None);
        assert_eq!(cache.get::<String>(&key), Some("text".into()));
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let cache = QueryCache::new();
        let key = QueryKey::new("x");
        cache.set(key.clone(), "text".to_string());
        let err = cache.fetch(key, || async { Ok(1_u32) }).await.unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch(_)));
    }
}
