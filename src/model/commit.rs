//! CommitBuilder - chain inserts, updates and deletes into one atomic commit.
//!
//! ## Example
//!
//! ```ignore
//! // Vote row, target counters and activity log land together or not at all.
//! store
//!     .batch()
//!     .insert(&vote)
//!     .update(&question)
//!     .insert(&activity)
//!     .commit()?;
//! ```

use super::{Model, ModelError, ModelStore, StoreKey, Versioned, Write};

/// Builder for chaining multiple writes into a single atomic commit.
///
/// Serialization failures are remembered and reported by `commit`, so the
/// chain itself never fails half-way.
pub struct CommitBuilder<'a, S> {
    store: &'a S,
    writes: Vec<Write>,
    error: Option<ModelError>,
}

impl<'a, S: ModelStore> CommitBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            writes: vec![],
            error: None,
        }
    }

    fn encode<M: Model>(&mut self, model: &M) -> Option<Vec<u8>> {
        match serde_json::to_vec(model) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                self.error.get_or_insert(ModelError::Serde(e.to_string()));
                None
            }
        }
    }

    /// Insert a new model. The commit fails if it already exists.
    pub fn insert<M: Model>(mut self, model: &M) -> Self {
        if let Some(bytes) = self.encode(model) {
            self.writes.push(Write::Insert {
                key: StoreKey::of::<M>(model.id()),
                bytes,
            });
        }
        self
    }

    /// Replace a model loaded at `model.version`. The commit fails if the
    /// stored version moved on in the meantime.
    pub fn update<M: Model>(mut self, model: &Versioned<M>) -> Self {
        if let Some(bytes) = self.encode(&model.data) {
            self.writes.push(Write::Update {
                key: StoreKey::of::<M>(model.data.id()),
                bytes,
                expected_version: model.version,
            });
        }
        self
    }

    /// Delete a model loaded at `model.version`.
    pub fn delete<M: Model>(mut self, model: &Versioned<M>) -> Self {
        self.writes.push(Write::Delete {
            key: StoreKey::of::<M>(model.data.id()),
            expected_version: Some(model.version),
        });
        self
    }

    /// Delete every model in `models`.
    pub fn delete_all<M: Model>(mut self, models: &[Versioned<M>]) -> Self {
        for model in models {
            self = self.delete(model);
        }
        self
    }

    /// Number of queued writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Apply all queued writes atomically. Returns the number of writes.
    pub fn commit(self) -> Result<usize, ModelError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let count = self.writes.len();
        if count > 0 {
            self.store.apply_writes(self.writes)?;
        }
        Ok(count)
    }
}

/// Extension trait to start a commit builder chain from any store.
pub trait CommitBuilderExt: ModelStore + Sized {
    fn batch(&self) -> CommitBuilder<'_, Self> {
        CommitBuilder::new(self)
    }
}

impl<S: ModelStore> CommitBuilderExt for S {}
