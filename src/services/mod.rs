//! Business operations. Each function takes the [`App`](crate::App), the
//! acting identity where one is needed, and typed input; handlers stay thin.

pub mod activity;
pub mod answers;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod questions;
pub mod stats;
pub mod tags;
pub mod users;
pub mod votes;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::api::HandlerError;
use crate::model::{Model, ModelStore, ModelsExt, Versioned};

/// Load a record or fail with `NotFound` naming `resource`.
pub(crate) fn load<M: Model, S: ModelStore>(
    store: &S,
    resource: &'static str,
    id: &str,
) -> Result<Versioned<M>, HandlerError> {
    store
        .models::<M>()
        .get(id)?
        .ok_or_else(|| HandlerError::not_found(resource, id))
}

/// Newest first, id as tiebreaker so pages are stable.
pub(crate) fn newest_first(a: (&DateTime<Utc>, &str), b: (&DateTime<Utc>, &str)) -> Ordering {
    b.0.cmp(a.0).then_with(|| a.1.cmp(b.1))
}

pub(crate) fn data<M>(records: Vec<Versioned<M>>) -> Vec<M> {
    records.into_iter().map(Versioned::into_inner).collect()
}
