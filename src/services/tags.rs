//! Tags shared by posts and questions. Content refers to tags by name.

use serde::Deserialize;
use tracing::debug;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Tag};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::policy::Actor;

use super::data;

const NAME_LOCKS: &str = "tag_names";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub name: String,
}

fn find_by_name<S: ModelStore>(app: &App<S>, name: &str) -> Result<Option<Tag>, HandlerError> {
    let lower = name.trim().to_lowercase();
    Ok(app
        .store()
        .models::<Tag>()
        .find_one(&|t| t.name.to_lowercase() == lower)?
        .map(|v| v.into_inner()))
}

/// All tags, alphabetically.
pub fn list<S: ModelStore>(app: &App<S>) -> Result<Vec<Tag>, HandlerError> {
    let mut tags = data(app.store().models::<Tag>().all()?);
    tags.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(tags)
}

pub fn create<S: ModelStore>(app: &App<S>, actor: &Actor, input: CreateTag) -> Result<Tag, HandlerError> {
    let name = input.name.trim();
    let _guard = app.lock(&[StoreKey::new(NAME_LOCKS, name.to_lowercase())])?;
    if find_by_name(app, name)?.is_some() {
        return Err(HandlerError::Conflict(format!("tag {} already exists", name)));
    }
    let tag = Tag::new(name);
    app.store()
        .batch()
        .insert(&tag)
        .insert(&ActivityLog::new(&actor.id, "tag.create", "tag", &tag.id))
        .commit()?;
    Ok(tag)
}

/// Create any of `names` that do not exist yet. Existing tags keep their
/// original spelling.
pub fn ensure<S: ModelStore>(app: &App<S>, names: &[String]) -> Result<(), HandlerError> {
    for name in names {
        let _guard = app.lock(&[StoreKey::new(NAME_LOCKS, name.to_lowercase())])?;
        if find_by_name(app, name)?.is_none() {
            app.store().models::<Tag>().insert(&Tag::new(name))?;
            debug!(tag = %name, "tag created on first use");
        }
    }
    Ok(())
}
