//! ModelStore - abstract storage for models.

use std::fmt;

use super::{Model, ModelError, Versioned};

/// Address of one stored record: collection plus id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub collection: &'static str,
    pub id: String,
}

impl StoreKey {
    pub fn new(collection: &'static str, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }

    pub fn of<M: Model>(id: impl Into<String>) -> Self {
        Self::new(M::COLLECTION, id)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.id)
    }
}

/// One type-erased write inside an atomic batch.
#[derive(Debug, Clone)]
pub enum Write {
    /// Create a record. Fails if the key already exists.
    Insert { key: StoreKey, bytes: Vec<u8> },
    /// Replace a record whose current version must equal `expected_version`.
    Update {
        key: StoreKey,
        bytes: Vec<u8>,
        expected_version: u64,
    },
    /// Remove a record. With `Some(version)` the record must exist at that version.
    Delete {
        key: StoreKey,
        expected_version: Option<u64>,
    },
}

impl Write {
    pub fn key(&self) -> &StoreKey {
        match self {
            Write::Insert { key, .. } | Write::Update { key, .. } | Write::Delete { key, .. } => key,
        }
    }
}

/// Abstract storage for models.
///
/// Single-record operations are atomic on their own; `apply_writes` makes a
/// whole batch atomic: either every write is applied or none is.
pub trait ModelStore: Send + Sync {
    /// Get a model by ID. Returns None if not found.
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError>;

    /// Upsert a model (insert or update, no version check).
    fn save_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError>;

    /// Insert a new model. Fails if it already exists.
    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError>;

    /// Update an existing model with optimistic concurrency control.
    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError>;

    /// Delete a model by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError>;

    /// Find models matching a predicate.
    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError>;

    /// Count models matching a predicate.
    fn count_models<M: Model>(&self, predicate: &dyn Fn(&M) -> bool) -> Result<usize, ModelError> {
        Ok(self.find_models(predicate)?.len())
    }

    /// Apply a batch of writes atomically. Every precondition (absent key for
    /// inserts, matching versions for updates/deletes) is checked before any
    /// write lands.
    fn apply_writes(&self, writes: Vec<Write>) -> Result<(), ModelError>;
}
