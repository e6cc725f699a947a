//! Client-side query cache.
//!
//! Query results are stored under a [`QueryKey`] (a name plus parameters,
//! e.g. `articles/{"page":1,...}`). Keys form a hierarchy by prefix, so
//! `articles` addresses every cached article listing at once for
//! cancellation, snapshots and invalidation.
//!
//! Guarantees:
//! - at most one in-flight fetch per key; concurrent callers join it
//! - while a refetch runs, readers see the previous value
//! - a cancelled fetch never writes its (stale) result

mod key;
mod store;

pub use key::{QueryKey, keys};
pub use store::{DEFAULT_STALE_TIME, EntryState, QueryCache, QueryError, Snapshot};
