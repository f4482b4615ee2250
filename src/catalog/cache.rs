//! Single-flight cache around catalog loading
//!
//! Concurrent callers share one in-flight load and all receive its result.
//! A successful bundle is kept until `invalidate`; a failure is reported to
//! everyone waiting on that load, then the next `get` starts a fresh one.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::loader::{load_catalog, CatalogBundle, CatalogSource};
use crate::core::error::CatalogError;

pub type LoadResult = Result<Arc<CatalogBundle>, CatalogError>;

/// Observable lifecycle of the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Ready,
    Failed,
}

enum Slot {
    Empty,
    Loading(watch::Receiver<Option<LoadResult>>),
    Ready(Arc<CatalogBundle>),
    Failed(CatalogError),
}

struct Inner {
    slot: Slot,
    /// Bumped by `invalidate` so a stale in-flight load can't repopulate
    generation: u64,
}

enum Next {
    Done(LoadResult),
    Wait(watch::Receiver<Option<LoadResult>>),
    Lead(watch::Sender<Option<LoadResult>>, u64),
}

/// Catalog cache service. Hold one per data source.
pub struct CatalogCache<S> {
    source: S,
    inner: Mutex<Inner>,
}

impl<S: CatalogSource> CatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                slot: Slot::Empty,
                generation: 0,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> CacheState {
        match self.lock().slot {
            Slot::Empty => CacheState::Empty,
            Slot::Loading(_) => CacheState::Loading,
            Slot::Ready(_) => CacheState::Ready,
            Slot::Failed(_) => CacheState::Failed,
        }
    }

    /// Get the catalog, loading it at most once across concurrent callers
    pub async fn get(&self) -> LoadResult {
        let next = {
            let mut inner = self.lock();
            let existing = match &inner.slot {
                Slot::Ready(bundle) => Some(Next::Done(Ok(Arc::clone(bundle)))),
                Slot::Loading(rx) => Some(Next::Wait(rx.clone())),
                Slot::Empty | Slot::Failed(_) => None,
            };
            existing.unwrap_or_else(|| {
                let (tx, rx) = watch::channel(None);
                inner.slot = Slot::Loading(rx);
                Next::Lead(tx, inner.generation)
            })
        };

        match next {
            Next::Done(result) => result,
            Next::Wait(rx) => Self::wait(rx).await,
            Next::Lead(tx, generation) => self.lead(tx, generation).await,
        }
    }

    /// Drop any cached bundle; the next `get` reloads
    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.slot = Slot::Empty;
    }

    async fn lead(&self, tx: watch::Sender<Option<LoadResult>>, generation: u64) -> LoadResult {
        let mut guard = LeadGuard {
            inner: &self.inner,
            generation,
            settled: false,
        };

        let result = load_catalog(&self.source).await.map(Arc::new);

        {
            let mut inner = self.lock();
            if inner.generation == generation {
                inner.slot = match &result {
                    Ok(bundle) => Slot::Ready(Arc::clone(bundle)),
                    Err(err) => Slot::Failed(err.clone()),
                };
            }
        }
        guard.settled = true;

        if let Err(err) = &result {
            tracing::warn!(error = %err, "catalog load failed");
        }

        // No receivers left is fine: nobody else was waiting.
        let _ = tx.send(Some(result.clone()));
        result
    }

    async fn wait(mut rx: watch::Receiver<Option<LoadResult>>) -> LoadResult {
        match rx.wait_for(Option::is_some).await {
            Ok(value) => Option::clone(&value).unwrap_or(Err(CatalogError::Abandoned)),
            Err(_) => Err(CatalogError::Abandoned),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }
}

impl<S: CatalogSource + 'static> CatalogCache<S> {
    /// Warm the cache in the background, ignoring failures
    ///
    /// Must be called from within a tokio runtime.
    pub fn preload(self: &Arc<Self>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = cache.get().await {
                tracing::debug!(error = %err, "catalog preload failed");
            }
        })
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Resets a `Loading` slot if the leading future is dropped mid-load
struct LeadGuard<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
    settled: bool,
}

impl Drop for LeadGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = lock_inner(self.inner);
        if inner.generation == self.generation && matches!(inner.slot, Slot::Loading(_)) {
            inner.slot = Slot::Empty;
        }
    }
}
