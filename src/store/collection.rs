//! Typed view over one collection of a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{DocumentStore, GroupCount, StoreResult, RESULT_CAP};
use crate::filter::FilterSet;

/// A document type stored in a [`Collection`]
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// The allocated integer id the document is keyed by
    fn id(&self) -> i64;
}

/// Record store for a single entity collection
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            _record: PhantomData,
        }
    }

    /// Store a new record keyed by its id
    pub async fn insert(&self, record: &T) -> StoreResult<()> {
        let document = serde_json::to_value(record)?;
        self.store.insert_one(&self.name, record.id(), document).await
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<T>> {
        match self.store.find_one(&self.name, id).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Merge `fields` into the record; returns the modified count
    pub async fn update(&self, id: i64, fields: Map<String, Value>) -> StoreResult<u64> {
        self.store.update_one(&self.name, id, fields).await
    }

    /// Returns the deleted count
    pub async fn delete(&self, id: i64) -> StoreResult<u64> {
        self.store.delete_one(&self.name, id).await
    }

    /// Matching records, capped at [`RESULT_CAP`]
    pub async fn find(&self, filter: &FilterSet) -> StoreResult<Vec<T>> {
        let documents = self.store.find(&self.name, filter, RESULT_CAP).await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            records.push(serde_json::from_value(document)?);
        }
        Ok(records)
    }

    /// Per-value counts of `field`, capped at [`RESULT_CAP`] groups
    pub async fn group_by(&self, field: &str) -> StoreResult<Vec<GroupCount>> {
        self.store.group_count(&self.name, field, RESULT_CAP).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: i64,
        body: String,
    }

    impl Record for Note {
        fn id(&self) -> i64 {
            self.id
        }
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let notes: Collection<Note> = Collection::new(Arc::new(MemoryStore::new()), "notes");
        let note = Note { id: 4, body: "hello".to_string() };

        notes.insert(&note).await.unwrap();
        assert_eq!(notes.get(4).await.unwrap(), Some(note));
        assert_eq!(notes.get(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let notes: Collection<Note> = Collection::new(Arc::new(MemoryStore::new()), "notes");
        notes
            .insert(&Note { id: 1, body: "draft".to_string() })
            .await
            .unwrap();

        let fields = json!({"body": "final"}).as_object().cloned().unwrap();
        assert_eq!(notes.update(1, fields).await.unwrap(), 1);

        let stored = notes.get(1).await.unwrap().unwrap();
        assert_eq!(stored, Note { id: 1, body: "final".to_string() });
    }
}
