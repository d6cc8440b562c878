//! Singleflight engine over the cache store.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::key_lock::KeyLock;
use super::FetchError;
use crate::model::{CacheKey, CacheRecord};
use crate::storage::CacheStore;

/// Where a served record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fresh record found without filling.
    Cache,
    /// This caller owned the round and filled the cache.
    Filled,
    /// This caller waited for another owner's round.
    Joined,
}

#[derive(Debug, Clone)]
pub struct Obtained {
    pub record: CacheRecord,
    pub origin: Origin,
}

/// Guarantees at most one fill per key at a time.
///
/// The lock table grows with the set of keys ever requested, which is
/// bounded by configuration; entries are never removed.
#[derive(Debug)]
pub struct FetchCoordinator {
    store: Arc<CacheStore>,
    locks: DashMap<CacheKey, Arc<KeyLock>>,
    wait_timeout: Duration,
}

impl FetchCoordinator {
    pub fn new(store: Arc<CacheStore>, wait_timeout: Duration) -> Self {
        Self {
            store,
            locks: DashMap::new(),
            wait_timeout,
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Returns true while an owner is filling `key`.
    pub fn in_flight(&self, key: &CacheKey) -> bool {
        self.locks
            .get(key)
            .map(|lock| lock.is_in_flight())
            .unwrap_or(false)
    }

    /// Returns a fresh record for `key`, running `fill` if this caller wins the round.
    ///
    /// `fill` must fetch the document, persist it through the store and
    /// return the record it wrote. It runs on its own task so the round
    /// completes even when the owning request goes away.
    pub async fn obtain_fresh<F, Fut>(&self, key: &CacheKey, fill: F) -> Result<Obtained, FetchError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<CacheRecord, FetchError>> + Send + 'static,
    {
        if let Some(record) = self.store.read(key).await? {
            debug!(component = "singleflight", event = "hit", key = %key, "served from cache");
            return Ok(Obtained {
                record,
                origin: Origin::Cache,
            });
        }

        let lock = self.key_lock(key);
        let mut done = lock.subscribe();

        let Some(guard) = lock.try_own() else {
            info!(component = "singleflight", event = "wait", key = %key, "waiting for cache update");

            match timeout(self.wait_timeout, done.changed()).await {
                Err(_) => {
                    warn!(
                        component = "singleflight",
                        event = "wait_timeout",
                        key = %key,
                        timeout = ?self.wait_timeout,
                        "gave up waiting for cache update"
                    );
                    return Err(FetchError::WaitTimeout(self.wait_timeout));
                }
                Ok(Err(_)) => return Err(FetchError::Abandoned),
                Ok(Ok(())) => {}
            }
            let outcome = done.borrow_and_update().clone();

            return match self.store.read(key).await? {
                Some(record) => Ok(Obtained {
                    record,
                    origin: Origin::Joined,
                }),
                None => Err(match outcome {
                    Some(Err(e)) => FetchError::Fill(e),
                    _ => FetchError::MissAfterFill,
                }),
            };
        };

        let store = self.store.clone();
        let round_key = key.clone();
        let round = tokio::spawn(async move {
            // A round finished between the fast path and acquiring the gate.
            let result = match store.read(&round_key).await {
                Ok(Some(record)) => Ok(Obtained {
                    record,
                    origin: Origin::Cache,
                }),
                Ok(None) => {
                    info!(component = "singleflight", event = "fill", key = %round_key, "updating cache");
                    fill().await.map(|record| Obtained {
                        record,
                        origin: Origin::Filled,
                    })
                }
                Err(e) => Err(FetchError::Io(e)),
            };

            let result = result.map_err(Arc::new);
            guard.finish(result.as_ref().map(|_| ()).map_err(Arc::clone));
            result
        });

        match round.await {
            Ok(Ok(obtained)) => Ok(obtained),
            Ok(Err(e)) => Err(FetchError::Fill(e)),
            Err(e) => {
                warn!(
                    component = "singleflight",
                    event = "fill_aborted",
                    key = %key,
                    error = %e,
                    "cache fill task did not complete"
                );
                Err(FetchError::Abandoned)
            }
        }
    }

    fn key_lock(&self, key: &CacheKey) -> Arc<KeyLock> {
        if let Some(lock) = self.locks.get(key) {
            return lock.clone();
        }
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(KeyLock::new()))
            .clone()
    }
}
