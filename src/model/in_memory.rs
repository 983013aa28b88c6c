//! InMemoryModelStore - HashMap-backed model store.
//!
//! The store is the system of record for a running process. It can be
//! exported to and restored from a JSON snapshot so data survives restarts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Model, ModelError, ModelStore, StoreKey, Versioned, Write};

/// Internal stored representation of a model.
struct StoredModel {
    bytes: Vec<u8>,
    version: u64,
}

/// One record in a JSON snapshot.
#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    version: u64,
    data: Value,
}

/// In-memory model store backed by a HashMap.
///
/// Storage key is `"COLLECTION:id"`. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryModelStore {
    storage: Arc<RwLock<HashMap<String, StoredModel>>>,
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelStore {
    /// Create a new empty model store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn make_key(collection: &str, id: &str) -> String {
        format!("{}:{}", collection, id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, StoredModel>>, ModelError> {
        self.storage
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, StoredModel>>, ModelError> {
        self.storage
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }

    /// Number of records across all collections.
    pub fn len(&self) -> Result<usize, ModelError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, ModelError> {
        Ok(self.read()?.is_empty())
    }

    /// Serialize every record (with its version) to a JSON document.
    pub fn export_json(&self) -> Result<Vec<u8>, ModelError> {
        let storage = self.read()?;
        let mut snapshot = BTreeMap::new();
        for (key, stored) in storage.iter() {
            let data: Value = serde_json::from_slice(&stored.bytes)
                .map_err(|e| ModelError::Serde(e.to_string()))?;
            snapshot.insert(
                key.clone(),
                SnapshotEntry {
                    version: stored.version,
                    data,
                },
            );
        }
        serde_json::to_vec_pretty(&snapshot).map_err(|e| ModelError::Serde(e.to_string()))
    }

    /// Build a store from a document produced by `export_json`.
    pub fn import_json(bytes: &[u8]) -> Result<Self, ModelError> {
        let snapshot: BTreeMap<String, SnapshotEntry> =
            serde_json::from_slice(bytes).map_err(|e| ModelError::Serde(e.to_string()))?;

        let mut storage = HashMap::with_capacity(snapshot.len());
        for (key, entry) in snapshot {
            let bytes =
                serde_json::to_vec(&entry.data).map_err(|e| ModelError::Serde(e.to_string()))?;
            storage.insert(
                key,
                StoredModel {
                    bytes,
                    version: entry.version,
                },
            );
        }

        Ok(Self {
            storage: Arc::new(RwLock::new(storage)),
        })
    }

    /// Load a snapshot file, or start empty if the file does not exist yet.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = fs::read(path)
            .map_err(|e| ModelError::Storage(format!("read {}: {}", path.display(), e)))?;
        Self::import_json(&bytes)
    }

    /// Write a snapshot file.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let bytes = self.export_json()?;
        fs::write(path, bytes)
            .map_err(|e| ModelError::Storage(format!("write {}: {}", path.display(), e)))
    }
}

fn conflict(key: &StoreKey, expected: u64, actual: u64) -> ModelError {
    ModelError::ConcurrencyConflict {
        collection: key.collection.to_string(),
        id: key.id.clone(),
        expected,
        actual,
    }
}

fn not_found(key: &StoreKey) -> ModelError {
    ModelError::NotFound {
        collection: key.collection.to_string(),
        id: key.id.clone(),
    }
}

impl ModelStore for InMemoryModelStore {
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        let key = Self::make_key(M::COLLECTION, id);
        let storage = self.read()?;

        match storage.get(&key) {
            Some(stored) => {
                let data: M = serde_json::from_slice(&stored.bytes)
                    .map_err(|e| ModelError::Serde(e.to_string()))?;
                Ok(Some(Versioned {
                    data,
                    version: stored.version,
                }))
            }
            None => Ok(None),
        }
    }

    fn save_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = serde_json::to_vec(model).map_err(|e| ModelError::Serde(e.to_string()))?;

        let mut storage = self.write()?;
        let new_version = storage.get(&key).map(|s| s.version + 1).unwrap_or(1);
        storage.insert(
            key,
            StoredModel {
                bytes,
                version: new_version,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: new_version,
        })
    }

    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = serde_json::to_vec(model).map_err(|e| ModelError::Serde(e.to_string()))?;

        let mut storage = self.write()?;
        if let Some(existing) = storage.get(&key) {
            return Err(ModelError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: 0,
                actual: existing.version,
            });
        }

        storage.insert(key, StoredModel { bytes, version: 1 });

        Ok(Versioned {
            data: model.clone(),
            version: 1,
        })
    }

    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError> {
        let key = Self::make_key(M::COLLECTION, model.id());
        let bytes = serde_json::to_vec(model).map_err(|e| ModelError::Serde(e.to_string()))?;

        let mut storage = self.write()?;
        let actual_version =
            storage
                .get(&key)
                .map(|s| s.version)
                .ok_or_else(|| ModelError::NotFound {
                    collection: M::COLLECTION.to_string(),
                    id: model.id().to_string(),
                })?;

        if actual_version != expected_version {
            return Err(ModelError::ConcurrencyConflict {
                collection: M::COLLECTION.to_string(),
                id: model.id().to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }

        let new_version = actual_version + 1;
        storage.insert(
            key,
            StoredModel {
                bytes,
                version: new_version,
            },
        );

        Ok(Versioned {
            data: model.clone(),
            version: new_version,
        })
    }

    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError> {
        let key = Self::make_key(M::COLLECTION, id);
        let mut storage = self.write()?;
        Ok(storage.remove(&key).is_some())
    }

    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        let storage = self.read()?;
        let prefix = format!("{}:", M::COLLECTION);
        let mut results = Vec::new();

        for (key, stored) in storage.iter() {
            if key.starts_with(&prefix) {
                if let Ok(data) = serde_json::from_slice::<M>(&stored.bytes) {
                    if predicate(&data) {
                        results.push(Versioned {
                            data,
                            version: stored.version,
                        });
                    }
                }
            }
        }

        Ok(results)
    }

    fn count_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<usize, ModelError> {
        let storage = self.read()?;
        let prefix = format!("{}:", M::COLLECTION);

        Ok(storage
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(_, stored)| serde_json::from_slice::<M>(&stored.bytes).ok())
            .filter(|data| predicate(data))
            .count())
    }

    fn apply_writes(&self, writes: Vec<Write>) -> Result<(), ModelError> {
        let mut storage = self.write()?;

        // Validate the whole batch against current versions, tracking the
        // effect of earlier writes on keys touched more than once.
        let mut staged: HashMap<String, Option<u64>> = HashMap::new();
        for write in &writes {
            let key = write.key();
            let raw_key = key.to_string();
            let current = match staged.get(&raw_key) {
                Some(version) => *version,
                None => storage.get(&raw_key).map(|s| s.version),
            };

            let next = match write {
                Write::Insert { .. } => {
                    if let Some(actual) = current {
                        return Err(conflict(key, 0, actual));
                    }
                    Some(1)
                }
                Write::Update {
                    expected_version, ..
                } => match current {
                    None => return Err(not_found(key)),
                    Some(actual) if actual != *expected_version => {
                        return Err(conflict(key, *expected_version, actual));
                    }
                    Some(actual) => Some(actual + 1),
                },
                Write::Delete {
                    expected_version, ..
                } => match (current, expected_version) {
                    (None, Some(_)) => return Err(not_found(key)),
                    (Some(actual), Some(expected)) if actual != *expected => {
                        return Err(conflict(key, *expected, actual));
                    }
                    _ => None,
                },
            };
            staged.insert(raw_key, next);
        }

        for write in writes {
            match write {
                Write::Insert { key, bytes } => {
                    storage.insert(key.to_string(), StoredModel { bytes, version: 1 });
                }
                Write::Update { key, bytes, .. } => {
                    let raw_key = key.to_string();
                    let version = storage.get(&raw_key).map(|s| s.version + 1).unwrap_or(1);
                    storage.insert(raw_key, StoredModel { bytes, version });
                }
                Write::Delete { key, .. } => {
                    storage.remove(&key.to_string());
                }
            }
        }

        Ok(())
    }
}
