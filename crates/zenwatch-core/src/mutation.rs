//! Optimistic mutation protocol.
//!
//! Every user action that changes server state runs through
//! [`run_optimistic`]:
//!
//! 1. cancel in-flight fetches under every affected prefix
//! 2. snapshot the cached values under those prefixes
//! 3. apply the change to the cache synchronously
//! 4. dispatch the request
//! 5. on success invalidate the affected keys and toast
//! 6. on failure restore the snapshot, toast and return the error
//!
//! Two mutations racing on the same keys are last-writer-wins: the second
//! snapshot already contains the first optimistic change.

use std::future::Future;

use tracing::{debug, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::error::{Error, Result};
use crate::notify::Notifier;

/// Which cache keys a mutation touches and what to tell the user.
#[derive(Debug, Clone)]
pub struct MutationPlan {
    name: &'static str,
    affected: Vec<QueryKey>,
    invalidate: Vec<QueryKey>,
    success_message: Option<String>,
    error_message: String,
}

impl MutationPlan {
    /// Creates an empty plan. `name` is used for logging.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            affected: Vec::new(),
            invalidate: Vec::new(),
            success_message: None,
            error_message: "Something went wrong".to_string(),
        }
    }

    /// Adds a prefix that is cancelled, snapshotted and invalidated.
    #[must_use]
    pub fn affects(mut self, prefix: QueryKey) -> Self {
        self.affected.push(prefix);
        self
    }

    /// Adds a prefix that is only invalidated after success.
    #[must_use]
    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidate.push(prefix);
        self
    }

    /// Toast shown after success.
    #[must_use]
    pub fn on_success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Toast shown after failure.
    #[must_use]
    pub fn on_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Prefixes that are snapshotted.
    #[must_use]
    pub fn affected(&self) -> &[QueryKey] {
        &self.affected
    }
}

/// Runs a mutation optimistically.
///
/// `apply` rewrites the cache before `dispatch` is awaited; if `dispatch`
/// fails every snapshotted entry is put back exactly as it was.
///
/// # Errors
///
/// Returns the dispatch error after the rollback.
pub async fn run_optimistic<T, A, Fut>(
    cache: &QueryCache,
    notifier: &Notifier,
    plan: MutationPlan,
    apply: A,
    dispatch: Fut,
) -> Result<T>
where
    A: FnOnce(&QueryCache),
    Fut: Future<Output = zenwatch_api::Result<T>>,
{
    for prefix in &plan.affected {
        cache.cancel(prefix);
    }
    let snapshot = cache.snapshot(&plan.affected);
    apply(cache);
    debug!(mutation = plan.name, entries = snapshot.len(), "Applied optimistic update");

    match dispatch.await {
        Ok(value) => {
            for prefix in plan.affected.iter().chain(&plan.invalidate) {
                cache.invalidate(prefix);
            }
            if let Some(message) = plan.success_message {
                notifier.success(message);
            }
            Ok(value)
        }
        Err(e) => {
            warn!(mutation = plan.name, error = %e, "Mutation failed, rolling back");
            cache.restore(snapshot);
            notifier.error(plan.error_message);
            Err(Error::Api(e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::ToastLevel;

    fn server_error() -> zenwatch_api::Error {
        zenwatch_api::Error::Status {
            status: 500,
            message: "boom".into(),
        }
    }

    #[tokio::test]
    async fn test_failure_restores_snapshot() {
        let cache = QueryCache::new();
        let notifier = Notifier::new();
        let mut toasts = notifier.subscribe();
        let list = QueryKey::new("items").with("p1");
        let single = QueryKey::new("items").with("p2");
        cache.set(list.clone(), vec![1, 2, 3]);
        cache.set(single.clone(), vec![4]);

        let plan = MutationPlan::new("remove")
            .affects(QueryKey::new("items"))
            .on_error("Could not remove");
        let result: Result<()> = run_optimistic(
            &cache,
            &notifier,
            plan,
            |cache| {
                cache.update_matching::<Vec<i32>>(&QueryKey::new("items"), |v| {
                    v.retain(|n| *n != 2);
                });
            },
            async { Err(server_error()) },
        )
        .await;

        assert!(matches!(result, Err(Error::Api(_))));
        assert_eq!(cache.get::<Vec<i32>>(&list), Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>(&single), Some(vec![4]));
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Could not remove");
    }

    #[tokio::test]
    async fn test_success_keeps_update_and_marks_stale() {
        let cache = QueryCache::new();
        let notifier = Notifier::new();
        let mut toasts = notifier.subscribe();
        let key = QueryKey::new("items");
        cache.set(key.clone(), vec![1, 2]);

        let plan = MutationPlan::new("add").affects(key.clone()).on_success("Added");
        let id = run_optimistic(
            &cache,
            &notifier,
            plan,
            |cache| {
                cache.update::<Vec<i32>>(&QueryKey::new("items"), |v| v.push(3));
            },
            async { Ok(42) },
        )
        .await
        .unwrap();

        assert_eq!(id, 42);
        assert_eq!(cache.get::<Vec<i32>>(&key), Some(vec![1, 2, 3]));
        assert!(cache.is_stale(&key));
        assert_eq!(toasts.recv().await.unwrap().message, "Added");
    }

    #[tokio::test]
    async fn test_apply_runs_before_dispatch() {
        let cache = QueryCache::new();
        let key = QueryKey::new("flag");
        cache.set(key.clone(), false);

        let observed = {
            let cache = cache.clone();
            let key = key.clone();
            async move { Ok(cache.get::<bool>(&key)) }
        };
        let seen = run_optimistic(
            &cache,
            &Notifier::new(),
            MutationPlan::new("flip").affects(key.clone()),
            |cache| {
                cache.update::<bool>(&QueryKey::new("flag"), |b| *b = true);
            },
            observed,
        )
        .await
        .unwrap();

        assert_eq!(seen, Some(true));
    }
}
