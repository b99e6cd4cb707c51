use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::{
    error::AppResult,
    models::{MovieDetail, MovieId},
};

type Slot = Arc<OnceCell<MovieDetail>>;

/// Session-scoped memo of detail lookups
///
/// Entries are created on the first successful fetch and never evicted or
/// persisted. Concurrent lookups of the same uncached identifier share one
/// fetch: the first caller runs it, the others await its result. A failed
/// fetch drops its slot, so the next caller tries again.
#[derive(Clone, Default)]
pub struct DetailCache {
    slots: Arc<Mutex<HashMap<MovieId, Slot>>>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &MovieId) -> Option<MovieDetail> {
        let slots = self.slots.lock().await;
        slots.get(id).and_then(|slot| slot.get().cloned())
    }

    /// Stores `detail`, replacing whatever was cached for `id`
    pub async fn put(&self, id: MovieId, detail: MovieDetail) {
        let mut slots = self.slots.lock().await;
        slots.insert(id, Arc::new(OnceCell::from(detail)));
    }

    /// Returns the cached detail or runs `fetcher` to obtain it
    ///
    /// `fetcher` is never invoked for an identifier that is already cached.
    /// Only successful results are stored; errors are handed back untouched.
    pub async fn get_or_fetch<F, Fut>(&self, id: &MovieId, fetcher: F) -> AppResult<MovieDetail>
    where
        F: FnOnce(MovieId) -> Fut,
        Fut: Future<Output = AppResult<MovieDetail>>,
    {
        // The map lock only covers slot lookup; the fetch itself runs unlocked
        // so other identifiers are not held up behind it.
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(id.clone()).or_default().clone()
        };

        if let Some(detail) = slot.get() {
            tracing::debug!(movie_id = %id, "Detail cache hit");
            return Ok(detail.clone());
        }

        let result = slot
            .get_or_try_init(|| {
                tracing::debug!(movie_id = %id, "Detail cache miss");
                fetcher(id.clone())
            })
            .await;

        match result {
            Ok(detail) => {
                // A waiter may have retried on a slot the failed caller already
                // dropped; put it back so the success is remembered.
                let mut slots = self.slots.lock().await;
                slots.entry(id.clone()).or_insert_with(|| slot.clone());
                Ok(detail.clone())
            }
            Err(e) => {
                self.discard_empty(id, &slot).await;
                Err(e)
            }
        }
    }

    /// Drops the slot for `id` if it is still `slot` and nothing filled it
    async fn discard_empty(&self, id: &MovieId, slot: &Slot) {
        let mut slots = self.slots.lock().await;
        let stale = slots
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized());
        if stale {
            slots.remove(id);
        }
    }

    /// Number of identifiers with a cached detail
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{MediaType, MovieSummary};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio_test::{assert_err, assert_ok};

    fn detail(id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            summary: MovieSummary {
                id: MovieId::from(id),
                title: title.to_string(),
                year: "2008".to_string(),
                poster: None,
                media_type: MediaType::Movie,
            },
            genre: Some("Action, Crime".to_string()),
            plot: Some("Full plot".to_string()),
            rating: Some("9.0".to_string()),
            director: None,
            actors: None,
            runtime: None,
            released: None,
        }
    }

    #[tokio::test]
    async fn test_get_on_empty_cache() {
        let cache = DetailCache::new();
        assert_eq!(cache.get(&MovieId::from("tt001")).await, None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = DetailCache::new();
        cache.put(MovieId::from("tt001"), detail("tt001", "A")).await;

        let cached = cache.get(&MovieId::from("tt001")).await.unwrap();
        assert_eq!(cached.summary.title, "A");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fetcher_not_invoked_when_cached() {
        let cache = DetailCache::new();
        let id = MovieId::from("tt001");
        cache.put(id.clone(), detail("tt001", "A")).await;

        let calls = AtomicUsize::new(0);
        let result = cache
            .get_or_fetch(&id, |id| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(detail(id.as_str(), "B")) }
            })
            .await;

        assert_eq!(assert_ok!(result).summary.title, "A");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let cache = DetailCache::new();
        let id = MovieId::from("tt001");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let result = cache
                .get_or_fetch(&id, |id| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(detail(id.as_str(), "A")) }
                })
                .await;
            assert_ok!(result);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = DetailCache::new();
        let id = MovieId::from("tt404");

        let result = cache
            .get_or_fetch(&id, |_| async {
                Err(AppError::NotFound("Incorrect IMDb ID.".to_string()))
            })
            .await;
        assert_err!(result);
        assert_eq!(cache.get(&id).await, None);
        assert!(cache.is_empty().await);

        // A later retry gets to fetch again
        let retry = cache
            .get_or_fetch(&id, |id| async move { Ok(detail(id.as_str(), "Found")) })
            .await;
        assert_eq!(assert_ok!(retry).summary.title, "Found");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_lookups_leave_no_slots_behind() {
        let cache = DetailCache::new();

        for n in 0..1000 {
            let id = MovieId::from(format!("tt{n:07}"));
            let result = cache
                .get_or_fetch(&id, |_| async {
                    Err(AppError::NotFound("Incorrect IMDb ID.".to_string()))
                })
                .await;
            assert_err!(result);
        }

        assert!(cache.is_empty().await);
        assert_eq!(cache.slots.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn test_waiter_retries_after_shared_fetch_fails() {
        let cache = DetailCache::new();
        let id = MovieId::from("tt001");
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let started = Arc::new(AtomicUsize::new(0));

        let first = {
            let cache = cache.clone();
            let id = id.clone();
            let started = started.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&id, |_| async move {
                        started.fetch_add(1, Ordering::SeqCst);
                        release_rx.await.ok();
                        Err(AppError::ExternalApi("Request limit reached!".to_string()))
                    })
                    .await
            })
        };

        while started.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = {
            let cache = cache.clone();
            let id = id.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&id, |id| async move { Ok(detail(id.as_str(), "B")) })
                    .await
            })
        };

        tokio::task::yield_now().await;
        release_tx.send(()).unwrap();

        assert_err!(first.await.unwrap());
        assert_eq!(assert_ok!(second.await.unwrap()).summary.title, "B");
        assert_eq!(cache.get(&id).await.unwrap().summary.title, "B");
        assert_eq!(cache.slots.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let cache = DetailCache::new();
        let id = MovieId::from("tt001");
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let first = {
            let cache = cache.clone();
            let id = id.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&id, |id| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release_rx.await.ok();
                        Ok(detail(id.as_str(), "A"))
                    })
                    .await
            })
        };

        // Let the first lookup start its fetch before issuing the second
        while calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = {
            let cache = cache.clone();
            let id = id.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch(&id, |id| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(detail(id.as_str(), "B"))
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;
        release_tx.send(()).unwrap();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.summary.title, "A");
        assert_eq!(second.summary.title, "A");
        assert_eq!(cache.get(&id).await.unwrap().summary.title, "A");
    }

    #[tokio::test]
    async fn test_different_ids_fetch_independently() {
        let cache = DetailCache::new();

        let a = cache
            .get_or_fetch(&MovieId::from("tt001"), |id| async move {
                Ok(detail(id.as_str(), "A"))
            })
            .await
            .unwrap();
        let b = cache
            .get_or_fetch(&MovieId::from("tt002"), |id| async move {
                Ok(detail(id.as_str(), "B"))
            })
            .await
            .unwrap();

        assert_eq!(a.summary.title, "A");
        assert_eq!(b.summary.title, "B");
        assert_eq!(cache.len().await, 2);
    }
}
