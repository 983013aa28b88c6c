//! ModelRepository - Typed accessor for model CRUD operations.

use std::marker::PhantomData;

use super::{Model, ModelError, ModelStore, Versioned};

/// Typed repository wrapper for accessing models of a specific type.
pub struct ModelRepository<'a, S, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

impl<'a, S: ModelStore, M: Model> ModelRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a model by ID.
    pub fn get(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.store.get_model(id)
    }

    /// Upsert a model (insert or update, no version check).
    pub fn save(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.store.save_model(model)
    }

    /// Insert a new model. Fails if it already exists.
    pub fn insert(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.store.insert_model(model)
    }

    /// Update an existing model with optimistic concurrency.
    pub fn update(&self, model: &Versioned<M>) -> Result<Versioned<M>, ModelError> {
        self.store.update_model(&model.data, model.version)
    }

    /// Delete a model by ID. Returns true if it existed.
    pub fn delete(&self, id: &str) -> Result<bool, ModelError> {
        self.store.delete_model::<M>(id)
    }

    /// Find models matching a predicate.
    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<Versioned<M>>, ModelError> {
        self.store.find_models(predicate)
    }

    /// Find the first model matching a predicate.
    pub fn find_one(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Option<Versioned<M>>, ModelError> {
        Ok(self.store.find_models(predicate)?.into_iter().next())
    }

    /// All models of this type.
    pub fn all(&self) -> Result<Vec<Versioned<M>>, ModelError> {
        self.store.find_models(&|_| true)
    }

    /// Count models matching a predicate.
    pub fn count(&self, predicate: &dyn Fn(&M) -> bool) -> Result<usize, ModelError> {
        self.store.count_models(predicate)
    }
}

/// Extension trait for typed model access on any ModelStore.
pub trait ModelsExt: ModelStore + Sized {
    /// Get a typed model repository.
    fn models<M: Model>(&self) -> ModelRepository<'_, Self, M> {
        ModelRepository::new(self)
    }
}

impl<S: ModelStore> ModelsExt for S {}
