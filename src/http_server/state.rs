//! Shared handler state.

use std::sync::Arc;

use crate::allocator::IdAllocator;
use crate::records::{ClockIn, ItemDocument, CLOCK_INS_COLLECTION, ITEMS_COLLECTION};
use crate::store::{Collection, DocumentStore};

/// Everything a handler needs, built once at startup around one store client
pub struct AppState {
    pub items: Collection<ItemDocument>,
    pub clock_ins: Collection<ClockIn>,
    pub ids: IdAllocator,
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            items: Collection::new(Arc::clone(&store), ITEMS_COLLECTION),
            clock_ins: Collection::new(Arc::clone(&store), CLOCK_INS_COLLECTION),
            ids: IdAllocator::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
