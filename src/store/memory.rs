//! In-memory document store.
//!
//! All collections and counters sit behind one [`parking_lot::RwLock`]. Every
//! mutation, including the counter increment, happens under the write lock
//! and never across an `.await`, so each operation is atomic with respect to
//! every other caller in the process.
//!
//! A store opened on a data file holds an exclusive lock on it for as long as
//! any clone is alive, and writes the whole state back to the file after every
//! mutation. A second process opening the same file is refused, so counters
//! (and therefore ids) stay unique across processes and restarts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{DocumentStore, GroupCount, StoreError, StoreResult};
use crate::filter::FilterSet;

/// Everything the store holds; also the data file layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    /// Documents by collection, then by id
    #[serde(default)]
    collections: BTreeMap<String, BTreeMap<i64, Value>>,

    /// Last issued value by counters collection, then by sequence name
    #[serde(default)]
    counters: BTreeMap<String, BTreeMap<String, i64>>,
}

/// Single-writer claim on a data file; the lock file is removed on drop
#[derive(Debug)]
struct DataFileLock {
    lock_path: PathBuf,
}

impl DataFileLock {
    fn acquire(path: &Path) -> StoreResult<Self> {
        let mut name = path.as_os_str().to_owned();
        name.push(".lock");
        let lock_path = PathBuf::from(name);

        match fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                let lock = Self { lock_path };
                writeln!(file, "{}", std::process::id())?;
                Ok(lock)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StoreError::Locked {
                path: path.display().to_string(),
                lock: lock_path.display().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for DataFileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Data file a store writes through to
#[derive(Debug)]
struct Persistence {
    path: PathBuf,
    _lock: DataFileLock,
}

/// Thread-safe in-memory [`DocumentStore`].
///
/// Cloning is cheap; all clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<StoreData>>,
    persistence: Option<Arc<Persistence>>,
}

impl MemoryStore {
    /// Store with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `path` and open a store seeded from it if the file exists.
    ///
    /// Fails with [`StoreError::Locked`] while another store holds the file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let lock = DataFileLock::acquire(path)?;

        let data = if path.exists() {
            let content = fs::read_to_string(path)?;
            let data: StoreData = serde_json::from_str(&content)?;
            tracing::info!(
                path = %path.display(),
                collections = data.collections.len(),
                "loaded data file"
            );
            data
        } else {
            tracing::info!(path = %path.display(), "no data file found, starting empty");
            StoreData::default()
        };

        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            persistence: Some(Arc::new(Persistence {
                path: path.to_path_buf(),
                _lock: lock,
            })),
        })
    }

    /// Number of documents in `collection`
    pub fn count(&self, collection: &str) -> usize {
        self.data
            .read()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Write `data` to the backing file, if any. Called with the write lock held
    /// so files land in mutation order.
    fn persist(&self, data: &StoreData) -> StoreResult<()> {
        match &self.persistence {
            Some(persistence) => write_data_file(&persistence.path, data),
            None => Ok(()),
        }
    }
}

/// Write via a sibling temp file and rename, so a crash mid-write leaves the
/// previous file intact
fn write_data_file(path: &Path, data: &StoreData) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(data)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;

    tracing::trace!(path = %path.display(), "wrote data file");
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn increment(&self, counters: &str, sequence: &str) -> StoreResult<i64> {
        let mut data = self.data.write();
        let seq = data
            .counters
            .entry(counters.to_string())
            .or_default()
            .entry(sequence.to_string())
            .or_insert(0);
        *seq += 1;
        let id = *seq;

        self.persist(&data)?;
        Ok(id)
    }

    async fn insert_one(&self, collection: &str, id: i64, document: Value) -> StoreResult<()> {
        let mut data = self.data.write();
        let docs = data.collections.entry(collection.to_string()).or_default();

        if docs.contains_key(&id) {
            return Err(StoreError::duplicate_key(collection, id));
        }
        docs.insert(id, document);

        self.persist(&data)?;
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: i64) -> StoreResult<Option<Value>> {
        let data = self.data.read();
        Ok(data
            .collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> StoreResult<u64> {
        let mut data = self.data.write();
        let Some(doc) = data
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(0);
        };

        let Some(obj) = doc.as_object_mut() else {
            return Err(StoreError::Internal(format!(
                "document {} in '{}' is not an object",
                id, collection
            )));
        };

        let mut changed = false;
        for (key, value) in fields {
            if obj.get(&key) != Some(&value) {
                obj.insert(key, value);
                changed = true;
            }
        }

        if changed {
            self.persist(&data)?;
        }
        Ok(u64::from(changed))
    }

    async fn delete_one(&self, collection: &str, id: i64) -> StoreResult<u64> {
        let mut data = self.data.write();
        let removed = data
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(&id));

        if removed.is_some() {
            self.persist(&data)?;
        }
        Ok(u64::from(removed.is_some()))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &FilterSet,
        limit: usize,
    ) -> StoreResult<Vec<Value>> {
        let data = self.data.read();
        let Some(docs) = data.collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .values()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn group_count(
        &self,
        collection: &str,
        field: &str,
        limit: usize,
    ) -> StoreResult<Vec<GroupCount>> {
        let data = self.data.read();
        let Some(docs) = data.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut groups: Vec<GroupCount> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for doc in docs.values() {
            let value = doc.get(field).cloned().unwrap_or(Value::Null);
            let key = value.to_string();
            match positions.get(&key) {
                Some(&pos) => groups[pos].count += 1,
                None => {
                    positions.insert(key, groups.len());
                    groups.push(GroupCount { value, count: 1 });
                }
            }
        }

        groups.truncate(limit);
        Ok(groups)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
