//! Post categories. Reads are public, writes are admin-only.

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::entities::{ActivityLog, Category, Post};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::policy::{ensure_admin, Actor};
use crate::text::slug_or_id;

use super::{data, load};

const NAME_LOCKS: &str = "category_names";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

fn name_taken<S: ModelStore>(app: &App<S>, name: &str, except_id: Option<&str>) -> Result<bool, HandlerError> {
    let lower = name.trim().to_lowercase();
    Ok(app
        .store()
        .models::<Category>()
        .find_one(&|c| c.name.to_lowercase() == lower && Some(c.id.as_str()) != except_id)?
        .is_some())
}

/// All categories, alphabetically.
pub fn list<S: ModelStore>(app: &App<S>) -> Result<Vec<Category>, HandlerError> {
    let mut categories = data(app.store().models::<Category>().all()?);
    categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(categories)
}

pub fn get<S: ModelStore>(app: &App<S>, id: &str) -> Result<Category, HandlerError> {
    Ok(load::<Category, _>(app.store(), "category", id)?.into_inner())
}

pub fn create<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    input: CreateCategory,
) -> Result<Category, HandlerError> {
    ensure_admin(actor)?;
    let _guard = app.lock(&[StoreKey::new(NAME_LOCKS, input.name.trim().to_lowercase())])?;
    if name_taken(app, &input.name, None)? {
        return Err(HandlerError::Conflict(format!("category {} already exists", input.name.trim())));
    }

    let category = Category::new(&input.name, input.description);
    app.store()
        .batch()
        .insert(&category)
        .insert(&ActivityLog::new(&actor.id, "category.create", "category", &category.id))
        .commit()?;
    Ok(category)
}

pub fn update<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    id: &str,
    input: UpdateCategory,
) -> Result<Category, HandlerError> {
    ensure_admin(actor)?;
    let mut keys = vec![StoreKey::of::<Category>(id)];
    if let Some(name) = &input.name {
        keys.push(StoreKey::new(NAME_LOCKS, name.trim().to_lowercase()));
    }
    let _guard = app.lock(&keys)?;

    let mut category = load::<Category, _>(app.store(), "category", id)?;
    if let Some(name) = input.name {
        if name_taken(app, &name, Some(id))? {
            return Err(HandlerError::Conflict(format!("category {} already exists", name.trim())));
        }
        category.data.slug = slug_or_id(&name, id);
        category.data.name = name.trim().to_string();
    }
    if let Some(description) = input.description {
        category.data.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    category.data.updated_at = Utc::now();

    app.store()
        .batch()
        .update(&category)
        .insert(&ActivityLog::new(&actor.id, "category.update", "category", id))
        .commit()?;
    Ok(category.into_inner())
}

/// Delete a category; its posts become uncategorized in the same batch.
///
/// Post writes that attach a category hold its lock, so once the key set
/// below is stable no new post can join it before the commit.
pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    ensure_admin(actor)?;

    let attached = || -> Result<Vec<StoreKey>, HandlerError> {
        let mut keys = vec![StoreKey::of::<Category>(id)];
        keys.extend(
            app.store()
                .models::<Post>()
                .find(&|p| p.category_id.as_deref() == Some(id))?
                .into_iter()
                .map(|p| StoreKey::of::<Post>(p.data.id)),
        );
        Ok(keys)
    };
    let _guard = app.lock_stable(attached)?;

    let category = load::<Category, _>(app.store(), "category", id)?;
    let mut posts = app.store().models::<Post>().find(&|p| p.category_id.as_deref() == Some(id))?;
    for post in &mut posts {
        post.data.category_id = None;
    }
    let mut batch = app.store().batch().delete(&category);
    for post in &posts {
        batch = batch.update(post);
    }
    batch
        .insert(&ActivityLog::new(&actor.id, "category.delete", "category", id))
        .commit()?;
    Ok(())
}
