//! # Document Store
//!
//! The persistence seam of the service. [`DocumentStore`] is the untyped,
//! collection-addressed interface a backend implements; [`Collection`] is the
//! typed per-entity view the HTTP layer works with.
//!
//! Documents are JSON objects keyed by the integer id handed out by the
//! [`IdAllocator`](crate::allocator::IdAllocator). Counters used by the
//! allocator live in their own collection and are only ever touched through
//! [`DocumentStore::increment`].

mod collection;
mod errors;
mod memory;

pub use collection::{Collection, Record};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::filter::FilterSet;

/// Maximum number of documents (or groups) returned by a single read
pub const RESULT_CAP: usize = 100;

/// Name of the collection holding sequence counters
pub const COUNTERS_COLLECTION: &str = "counters";

/// One row of a grouping aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    /// Shared field value (`null` when the field is missing)
    pub value: Value,
    pub count: u64,
}

/// Abstract document store.
///
/// Implementations must be thread-safe and must make [`increment`] a single
/// atomic read-modify-write: two concurrent callers may never observe the same
/// returned value for one sequence.
///
/// [`increment`]: DocumentStore::increment
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Increment the counter `sequence` in `counters` by one and return the new
    /// value. A missing counter starts at 0, so the first call returns 1.
    async fn increment(&self, counters: &str, sequence: &str) -> StoreResult<i64>;

    /// Store a new document under `id`. Fails with `DuplicateKey` if taken.
    async fn insert_one(&self, collection: &str, id: i64, document: Value) -> StoreResult<()>;

    /// Point lookup by id
    async fn find_one(&self, collection: &str, id: i64) -> StoreResult<Option<Value>>;

    /// Merge `fields` into the document under `id`.
    ///
    /// Returns the modified count: 0 when the document is absent or when the
    /// merge leaves it unchanged, 1 otherwise. Never creates a document.
    async fn update_one(
        &self,
        collection: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> StoreResult<u64>;

    /// Remove the document under `id`, returning the deleted count (0 or 1)
    async fn delete_one(&self, collection: &str, id: i64) -> StoreResult<u64>;

    /// Documents matching `filter` in ascending id order, at most `limit`
    async fn find(
        &self,
        collection: &str,
        filter: &FilterSet,
        limit: usize,
    ) -> StoreResult<Vec<Value>>;

    /// Count documents per distinct value of `field`, at most `limit` groups,
    /// in the order each value is first seen
    async fn group_count(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> StoreResult<Vec<GroupCount>>;

    /// Cheap reachability probe used by the health endpoint
    async fn ping(&self) -> StoreResult<()>;
}
