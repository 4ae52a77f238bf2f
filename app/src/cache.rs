//! Keyed result cache shared by every request the server handles.
//!
//! Each key owns a [`watch`] channel holding its [`QueryState`]. The first
//! caller to find an entry idle claims it and runs the loader; concurrent
//! callers for the same key wait on the channel and receive the same result.
//! Settled entries are served from memory until they are invalidated.

use core::fmt;
use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::types::{BlogPostFilters, ProjectFilters};

/// Identity of a cached query: the kind of data plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Profile(String),
    Projects(ProjectFilters),
    Project(String),
    BlogPosts(BlogPostFilters),
    BlogPost(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(id) => write!(f, "profile `{id}`"),
            Self::Projects(_) => f.write_str("projects"),
            Self::Project(id) => write!(f, "project `{id}`"),
            Self::BlogPosts(_) => f.write_str("blog posts"),
            Self::BlogPost(slug) => write!(f, "blog post `{slug}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T, E> {
    Idle,
    Loading,
    Success(T),
    Failed(E),
}

impl<T, E> QueryState<T, E> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed(_))
    }
}

type Slot<T, E> = Arc<watch::Sender<QueryState<T, E>>>;

pub struct QueryCache<T, E> {
    entries: DashMap<QueryKey, Slot<T, E>>,
}

impl<T, E> Default for QueryCache<T, E> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T, E> fmt::Debug for QueryCache<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<T, E> QueryCache<T, E>
where
    T: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &QueryKey) -> Slot<T, E> {
        Arc::clone(
            self.entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(watch::channel(QueryState::Idle).0))
                .value(),
        )
    }

    /// Returns the cached result for `key`, running `load` if nothing is
    /// cached and no other caller is already loading it.
    ///
    /// If the caller running the loader is cancelled, the entry goes back to
    /// idle and one of the waiters takes over.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, load: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);

        loop {
            if claim(&slot) {
                break;
            }
            if let Some(result) = wait_settled(&slot).await {
                return result;
            }
        }

        let mut guard = LoadGuard {
            slot: &slot,
            finished: false,
        };
        let result = load().await;
        guard.finish(match &result {
            Ok(value) => QueryState::Success(value.clone()),
            Err(err) => QueryState::Failed(err.clone()),
        });
        result
    }

    #[must_use]
    pub fn state(&self, key: &QueryKey) -> QueryState<T, E> {
        self.entries
            .get(key)
            .map_or(QueryState::Idle, |slot| slot.borrow().clone())
    }

    /// Drops the settled result for `key` so the next fetch reloads it.
    /// An in-flight load is left alone.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(slot) = self.entries.get(key) {
            reset(&slot);
        }
    }

    /// Invalidates every key.
    pub fn clear(&self) {
        for slot in &self.entries {
            reset(slot.value());
        }
    }
}

fn claim<T, E>(slot: &watch::Sender<QueryState<T, E>>) -> bool {
    slot.send_if_modified(|state| {
        if matches!(state, QueryState::Idle) {
            *state = QueryState::Loading;
            true
        } else {
            false
        }
    })
}

fn reset<T, E>(slot: &watch::Sender<QueryState<T, E>>) {
    slot.send_if_modified(|state| {
        if state.is_settled() {
            *state = QueryState::Idle;
            true
        } else {
            false
        }
    });
}

/// Waits for the entry to leave `Loading`. `None` means it went back to
/// idle and the caller should try to claim it.
async fn wait_settled<T, E>(slot: &watch::Sender<QueryState<T, E>>) -> Option<Result<T, E>>
where
    T: Clone,
    E: Clone,
{
    let mut rx = slot.subscribe();
    let state = rx.wait_for(|state| !state.is_loading()).await.ok()?;
    match &*state {
        QueryState::Success(value) => Some(Ok(value.clone())),
        QueryState::Failed(err) => Some(Err(err.clone())),
        QueryState::Idle | QueryState::Loading => None,
    }
}

struct LoadGuard<'a, T, E> {
    slot: &'a watch::Sender<QueryState<T, E>>,
    finished: bool,
}

impl<T, E> LoadGuard<'_, T, E> {
    fn finish(&mut self, state: QueryState<T, E>) {
        self.slot.send_replace(state);
        self.finished = true;
    }
}

impl<T, E> Drop for LoadGuard<'_, T, E> {
    fn drop(&mut self) {
        if !self.finished {
            self.slot.send_if_modified(|state| {
                if state.is_loading() {
                    *state = QueryState::Idle;
                    true
                } else {
                    false
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn key() -> QueryKey {
        QueryKey::Project("p1".to_owned())
    }

    #[tokio::test]
    async fn caches_successful_result() {
        let cache = QueryCache::<u32, String>::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        };

        assert_eq!(cache.fetch(&key(), load).await, Ok(7));
        assert_eq!(cache.fetch(&key(), load).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state(&key()), QueryState::Success(7));
    }

    #[tokio::test]
    async fn failures_are_cached_until_invalidated() {
        let cache = QueryCache::<u32, String>::new();

        let first = cache
            .fetch(&key(), || async { Err("down".to_owned()) })
            .await;
        assert_eq!(first, Err("down".to_owned()));

        let cached = cache.fetch(&key(), || async { Ok(1) }).await;
        assert_eq!(cached, Err("down".to_owned()));

        cache.invalidate(&key());
        assert_eq!(cache.state(&key()), QueryState::Idle);
        assert_eq!(cache.fetch(&key(), || async { Ok(1) }).await, Ok(1));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = QueryCache::<String, String>::new();
        let a = QueryKey::BlogPost("a".to_owned());
        let b = QueryKey::BlogPost("b".to_owned());

        cache.fetch(&a, || async { Ok("a".to_owned()) }).await.unwrap();
        cache.fetch(&b, || async { Ok("b".to_owned()) }).await.unwrap();
        cache.invalidate(&a);

        assert_eq!(cache.state(&a), QueryState::Idle);
        assert_eq!(cache.state(&b), QueryState::Success("b".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_fetches_share_one_load() {
        let cache = QueryCache::<u32, String>::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let load = || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(42)
        };

        let key = key();
        let (a, b, c) = tokio::join!(
            cache.fetch(&key, load),
            cache.fetch(&key, load),
            cache.fetch(&key, load),
        );

        assert_eq!((a, b, c), (Ok(42), Ok(42), Ok(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_load_hands_over_to_waiter() {
        let cache = Arc::new(QueryCache::<u32, String>::new());

        let leader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .fetch(&key(), || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(cache.state(&key()).is_loading());

        let follower = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.fetch(&key(), || async { Ok(2) }).await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        leader.abort();
        assert_eq!(follower.await.unwrap(), Ok(2));
        assert_eq!(cache.state(&key()), QueryState::Success(2));
    }

    #[tokio::test]
    async fn clear_resets_every_settled_entry() {
        let cache = QueryCache::<u32, String>::new();
        let keys = [
            QueryKey::Profile("1".to_owned()),
            QueryKey::Projects(ProjectFilters::default()),
            QueryKey::BlogPosts(BlogPostFilters::published()),
        ];
        for key in &keys {
            cache.fetch(key, || async { Ok(1) }).await.unwrap();
        }

        cache.clear();

        for key in &keys {
            assert_eq!(cache.state(key), QueryState::Idle);
        }
    }

    #[test]
    fn keys_with_different_filters_differ() {
        assert_ne!(
            QueryKey::Projects(ProjectFilters::default()),
            QueryKey::Projects(ProjectFilters::featured(3))
        );
        assert_eq!(
            QueryKey::BlogPost("hello".to_owned()).to_string(),
            "blog post `hello`"
        );
    }
}
