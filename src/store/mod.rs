//! In-memory capture store.
//!
//! Holds immutable `Capture` records between the scrape and clone stages,
//! keyed by a fresh opaque identifier. Deliberately a bounded per-process
//! cache: at `capacity` the oldest record (insertion order) is evicted so
//! sustained traffic cannot grow the store without bound.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::capture::Capture;

/// Store-stage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No capture exists under the given identifier. Unknown ids never
    /// produce a default record.
    #[error("no capture found for id {0}")]
    NotFound(String),
}

struct Inner {
    map: HashMap<String, Arc<Capture>>,
    /// Key insertion order (front = oldest, back = newest).
    order: VecDeque<String>,
}

/// Keyed holding area for capture records.
///
/// Records are immutable after `put`; readers share them through `Arc`, so
/// concurrent `get` calls on one id always observe identical data. The lock
/// brackets only the map operations — never a network or disk await.
pub struct CaptureStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl CaptureStore {
    /// Create a store bounded at `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: RwLock::new(Inner {
                map: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Store a capture under a fresh unique identifier and return the id.
    ///
    /// The id is never derived from the source URL — repeated captures of
    /// one URL produce distinct, independent entries. At capacity, the
    /// oldest entry is evicted first.
    pub async fn put(&self, mut capture: Capture) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        capture.id = id.clone();

        let mut inner = self.inner.write().await;
        if inner.map.len() >= self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.map.remove(&evicted);
                debug!(id = %evicted, "capture evicted (store at capacity)");
            }
        }
        inner.order.push_back(id.clone());
        inner.map.insert(id.clone(), Arc::new(capture));
        id
    }

    /// Fetch the capture stored under `id`.
    ///
    /// Read-only and idempotent; repeated calls return the identical record.
    pub async fn get(&self, id: &str) -> Result<Arc<Capture>, StoreError> {
        self.inner
            .read()
            .await
            .map
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Snapshot of all stored captures, oldest first.
    pub async fn list(&self) -> Vec<Arc<Capture>> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.map.get(id).cloned())
            .collect()
    }

    /// Current number of stored captures.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.map.is_empty()
    }
}
