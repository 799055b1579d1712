//! Sequential id allocation.
//!
//! Ids come from named counters in the store's `counters` collection. The
//! increment is delegated to [`DocumentStore::increment`], which performs the
//! read-increment-return as one atomic operation; nothing here caches or
//! pre-reserves values.

use std::sync::Arc;

use crate::store::{DocumentStore, StoreResult, COUNTERS_COLLECTION};

/// Counter used for item ids
pub const ITEM_SEQUENCE: &str = "itemid";

/// Counter used for clock-in ids
pub const CLOCK_IN_SEQUENCE: &str = "clockinid";

/// Hands out unique, strictly increasing ids per sequence name
#[derive(Clone)]
pub struct IdAllocator {
    store: Arc<dyn DocumentStore>,
}

impl IdAllocator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Next id for `sequence`; the first call for a sequence returns 1.
    ///
    /// On error no id has been allocated.
    pub async fn next(&self, sequence: &str) -> StoreResult<i64> {
        let id = self.store.increment(COUNTERS_COLLECTION, sequence).await?;
        tracing::debug!(sequence, id, "allocated id");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_sequential_ids_strictly_increase() {
        let allocator = IdAllocator::new(Arc::new(MemoryStore::new()));

        let mut ids = Vec::new();
        for _ in 0..10 {
            ids.push(allocator.next(ITEM_SEQUENCE).await.unwrap());
        }

        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_sequences_are_independent() {
        let allocator = IdAllocator::new(Arc::new(MemoryStore::new()));

        assert_eq!(allocator.next(ITEM_SEQUENCE).await.unwrap(), 1);
        assert_eq!(allocator.next(ITEM_SEQUENCE).await.unwrap(), 2);
        assert_eq!(allocator.next(CLOCK_IN_SEQUENCE).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_clones_share_counters() {
        let allocator = IdAllocator::new(Arc::new(MemoryStore::new()));
        let mut tasks = tokio::task::JoinSet::new();

        for _ in 0..16 {
            let allocator = allocator.clone();
            tasks.spawn(async move { allocator.next(CLOCK_IN_SEQUENCE).await.unwrap() });
        }

        let mut ids = Vec::new();
        while let Some(id) = tasks.join_next().await {
            ids.push(id.unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }
}
