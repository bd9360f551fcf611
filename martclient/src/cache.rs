//! The client-side permission cache.  Grant changes land server side
//! first; a signed in console observes its own set at most one TTL
//! late, or right away after [`PermissionCache::invalidate`], which
//! login and logout are expected to call.  That staleness window is the
//! accepted tradeoff for keeping menu rendering off the network.

use async_trait::async_trait;
use martcore::ac::grant::PermissionSet;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::time::Duration;
use tokio::{
    sync::Mutex,
    time::Instant,
};

use crate::error::ClientError;

/// Where the cache turns when its entry is missing or expired.  The
/// usual source is [`Api`] asking the server for the signed in user's
/// resolved set.
///
/// [`Api`]: crate::api::Api
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn fetch_permissions(&self) -> Result<PermissionSet, ClientError>;
}

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct Entry {
    set: PermissionSet,
    fetched_at: Instant,
    epoch: u64,
}

pub struct PermissionCache<S> {
    source: S,
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
    epoch: AtomicU64,
}

impl<S: PermissionSource> PermissionCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: Mutex::new(None),
            epoch: AtomicU64::new(0),
        }
    }

    /// The wrapped source, for the calls that go around the cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The current set: straight from the cache while the entry is
    /// younger than the TTL, otherwise through one fetch from the
    /// source.  The entry lock is held across that fetch, so however
    /// many callers arrive at an expired entry, one network call goes
    /// out and the rest share its result.
    ///
    /// A failed fetch leaves the entry as it was and hands the error
    /// back; a failure is never adopted as an empty set.
    pub async fn get(&self) -> Result<PermissionSet, ClientError> {
        let mut entry = self.entry.lock().await;
        let epoch = self.epoch.load(Ordering::Acquire);
        if let Some(entry) = entry.as_ref() {
            if entry.epoch == epoch && entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.set.clone());
            }
        }
        let fetched_at = Instant::now();
        let set = self.source.fetch_permissions().await?;
        // an invalidation while the fetch was in flight orphans the
        // result: the caller still gets it, the cache does not
        if self.epoch.load(Ordering::Acquire) == epoch {
            *entry = Some(Entry {
                set: set.clone(),
                fetched_at,
                epoch,
            });
        }
        Ok(set)
    }

    /// Abandons the entry without waiting out an in-flight fetch.  Call
    /// on login and logout, or after an operation known to have changed
    /// the caller's own grants.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}
