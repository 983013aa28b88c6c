//! Models - typed, versioned records kept in a `ModelStore`.
//!
//! Every persisted entity of the platform (users, posts, questions, votes, ...)
//! is a `Model`: a serde-serializable struct with a collection name and a
//! string id. The store tracks a version per record for optimistic
//! concurrency, and `CommitBuilder` groups several writes into one atomic
//! batch.
//!
//! ## Example
//!
//! ```ignore
//! use blogqa::{CommitBuilderExt, InMemoryModelStore, Model, ModelsExt};
//!
//! #[derive(Clone, Serialize, Deserialize, Model)]
//! #[model(collection = "questions")]
//! struct Question { id: String, upvote_count: u32 }
//!
//! let store = InMemoryModelStore::new();
//! store.models::<Question>().insert(&question)?;
//!
//! let mut loaded = store.models::<Question>().get("q-1")?.unwrap();
//! loaded.data.upvote_count += 1;
//! store.batch().insert(&vote).update(&loaded).commit()?;
//! ```

mod commit;
mod in_memory;
mod model_repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g. "questions", "votes").
    /// Maps to a table in SQL, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;
}

/// A versioned wrapper around model data for optimistic concurrency control.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    #[error("model serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("model storage error: {0}")]
    Storage(String),
    /// Model not found.
    #[error("model not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
}

pub use commit::{CommitBuilder, CommitBuilderExt};
pub use in_memory::InMemoryModelStore;
pub use model_repository::{ModelRepository, ModelsExt};
pub use store::{ModelStore, StoreKey, Write};
