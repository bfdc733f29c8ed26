//! Page regeneration cache
//!
//! Keeps the last generated props per route. A page older than the route's
//! revalidation interval is still served while a background task rebuilds it;
//! only one rebuild per page runs at a time. A failed rebuild keeps the previous
//! page, a rebuild that finds nothing drops it.

use lru::LruCache;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::services::metrics;

struct CachedPage<T> {
    page: Arc<T>,
    generated_at: Instant,
    refreshing: bool,
}

impl<T> CachedPage<T> {
    fn new(page: Arc<T>) -> Self {
        Self {
            page,
            generated_at: Instant::now(),
            refreshing: false,
        }
    }
}

enum Lookup<T> {
    /// Fresh, or stale with a rebuild already under way
    Serve(Arc<T>),
    /// Stale and this caller owns the rebuild
    Refresh(Arc<T>),
    Missing,
}

pub struct PageCache<T> {
    name: &'static str,
    revalidate: Duration,
    /// Locked only for lookups and inserts, never across a regeneration
    entries: Arc<Mutex<LruCache<String, CachedPage<T>>>>,
}

impl<T: Send + Sync + 'static> PageCache<T> {
    pub fn new(name: &'static str, revalidate: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            name,
            revalidate,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    /// Number of pages currently held
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Serve a page that always exists, generating it on first use
    pub async fn get_or_generate<F, Fut, E>(&self, key: &str, generate: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        match self.lookup(key).await {
            Lookup::Serve(page) => Ok(page),
            Lookup::Refresh(page) => {
                let rebuild = generate();
                self.spawn_refresh(key, async move { rebuild.await.map(Some) });
                Ok(page)
            }
            Lookup::Missing => match generate().await {
                Ok(page) => Ok(self.store(key, page).await),
                Err(e) => Err(self.first_generation_failed(key, e)),
            },
        }
    }

    /// Serve a page that may disappear, regenerating it when stale or missing
    ///
    /// `regenerate` yields `Ok(None)` when the page no longer exists.
    pub async fn get_or_regenerate<F, Fut, E>(
        &self,
        key: &str,
        regenerate: F,
    ) -> Result<Option<Arc<T>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        match self.lookup(key).await {
            Lookup::Serve(page) => Ok(Some(page)),
            Lookup::Refresh(page) => {
                self.spawn_refresh(key, regenerate());
                Ok(Some(page))
            }
            Lookup::Missing => match regenerate().await {
                Ok(Some(page)) => Ok(Some(self.store(key, page).await)),
                Ok(None) => {
                    self.entries.lock().await.pop(key);
                    metrics::record_regeneration(self.name, "not_found");
                    Ok(None)
                }
                Err(e) => Err(self.first_generation_failed(key, e)),
            },
        }
    }

    async fn lookup(&self, key: &str) -> Lookup<T> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(cached) if cached.generated_at.elapsed() < self.revalidate || cached.refreshing => {
                Lookup::Serve(Arc::clone(&cached.page))
            }
            Some(cached) => {
                cached.refreshing = true;
                Lookup::Refresh(Arc::clone(&cached.page))
            }
            None => Lookup::Missing,
        }
    }

    async fn store(&self, key: &str, page: T) -> Arc<T> {
        let page = Arc::new(page);
        self.entries
            .lock()
            .await
            .put(key.to_string(), CachedPage::new(Arc::clone(&page)));
        metrics::record_regeneration(self.name, "ok");
        page
    }

    fn first_generation_failed<E: std::fmt::Display>(&self, key: &str, e: E) -> E {
        error!(page = self.name, key = key, error = %e, "Regeneration failed");
        metrics::record_regeneration(self.name, "error");
        e
    }

    fn spawn_refresh<Fut, E>(&self, key: &str, rebuild: Fut)
    where
        Fut: Future<Output = Result<Option<T>, E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        let name = self.name;
        let key = key.to_string();
        debug!(page = name, key = %key, "Serving stale page while regenerating");

        tokio::spawn(async move {
            let result = rebuild.await;
            let mut entries = entries.lock().await;
            match result {
                Ok(Some(page)) => {
                    entries.put(key, CachedPage::new(Arc::new(page)));
                    metrics::record_regeneration(name, "ok");
                }
                Ok(None) => {
                    entries.pop(&key);
                    metrics::record_regeneration(name, "not_found");
                }
                Err(e) => {
                    if let Some(cached) = entries.get_mut(&key) {
                        cached.refreshing = false;
                    }
                    warn!(
                        page = name,
                        key = %key,
                        error = %e,
                        "Regeneration failed, serving previous page"
                    );
                    metrics::record_regeneration(name, "stale");
                }
            }
        });
    }
}
