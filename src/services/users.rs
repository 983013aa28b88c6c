//! Accounts and their administration.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use validator::{validate_email, Validate};

use crate::api::HandlerError;
use crate::app::App;
use crate::auth::hash_password;
use crate::config::BootstrapAdmin;
use crate::entities::{normalize_email, ActivityLog, Role, User, UserView};
use crate::model::{CommitBuilderExt, ModelStore, ModelsExt, StoreKey};
use crate::pagination::{paginate, Page, PageRequest};
use crate::policy::{ensure_admin, Actor};
use crate::text::contains_ci;

use super::{data, load, newest_first};

const EMAIL_LOCKS: &str = "user_emails";

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
}

pub fn find_by_email<S: ModelStore>(app: &App<S>, email: &str) -> Result<Option<User>, HandlerError> {
    let email = normalize_email(email);
    Ok(app
        .store()
        .models::<User>()
        .find_one(&|u| u.email == email)?
        .map(|v| v.into_inner()))
}

/// Insert a new account. Fails with `Conflict` if the email is taken.
pub fn create<S: ModelStore>(
    app: &App<S>,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, HandlerError> {
    let email = normalize_email(email);
    if !validate_email(email.as_str()) {
        return Err(HandlerError::Validation("email: must be a valid email address".into()));
    }
    let password_hash = hash_password(password)?;
    let _guard = app.lock(&[StoreKey::new(EMAIL_LOCKS, email.as_str())])?;

    if find_by_email(app, &email)?.is_some() {
        return Err(HandlerError::Conflict("email is already registered".into()));
    }

    let user = User::new(name, &email, password_hash, role);
    app.store()
        .batch()
        .insert(&user)
        .insert(&ActivityLog::new(&user.id, "user.register", "user", &user.id))
        .commit()?;
    info!(user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}

/// Returns whether an account was created.
pub fn ensure_admin_account<S: ModelStore>(app: &App<S>, admin: &BootstrapAdmin) -> Result<bool, HandlerError> {
    if find_by_email(app, &admin.email)?.is_some() {
        return Ok(false);
    }
    create(app, &admin.name, &admin.email, &admin.password, Role::Admin)?;
    Ok(true)
}

pub fn get<S: ModelStore>(app: &App<S>, id: &str) -> Result<User, HandlerError> {
    Ok(load::<User, _>(app.store(), "user", id)?.into_inner())
}

pub fn list<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    filter: &UserFilter,
    request: PageRequest,
) -> Result<Page<UserView>, HandlerError> {
    ensure_admin(actor)?;
    let mut users = data(app.store().models::<User>().find(&|u| {
        filter
            .search
            .as_deref()
            .map_or(true, |q| contains_ci(&u.name, q) || contains_ci(&u.email, q))
            && filter.role.map_or(true, |role| u.role == role)
            && filter.is_active.map_or(true, |active| u.is_active == active)
    })?);
    users.sort_by(|a, b| newest_first((&a.created_at, &a.id), (&b.created_at, &b.id)));
    Ok(paginate(users, request).map(|u| u.view()))
}

pub fn update<S: ModelStore>(
    app: &App<S>,
    actor: &Actor,
    id: &str,
    input: UpdateUser,
) -> Result<User, HandlerError> {
    ensure_admin(actor)?;
    if actor.id == id && (input.is_active == Some(false) || input.role == Some(Role::User)) {
        return Err(HandlerError::Forbidden(
            "administrators cannot deactivate or demote themselves".into(),
        ));
    }

    let _guard = app.lock(&[StoreKey::of::<User>(id)])?;
    let mut user = load::<User, _>(app.store(), "user", id)?;
    if let Some(name) = input.name {
        user.data.name = name.trim().to_string();
    }
    if let Some(role) = input.role {
        user.data.role = role;
    }
    if let Some(is_active) = input.is_active {
        user.data.is_active = is_active;
    }
    if let Some(bio) = input.bio {
        user.data.bio = Some(bio).filter(|b| !b.trim().is_empty());
    }
    user.data.updated_at = Utc::now();

    app.store()
        .batch()
        .update(&user)
        .insert(&ActivityLog::new(&actor.id, "user.update", "user", id))
        .commit()?;
    Ok(user.into_inner())
}

pub fn delete<S: ModelStore>(app: &App<S>, actor: &Actor, id: &str) -> Result<(), HandlerError> {
    ensure_admin(actor)?;
    if actor.id == id {
        return Err(HandlerError::Forbidden("administrators cannot delete themselves".into()));
    }

    let _guard = app.lock(&[StoreKey::of::<User>(id)])?;
    let user = load::<User, _>(app.store(), "user", id)?;
    app.store()
        .batch()
        .delete(&user)
        .insert(&ActivityLog::new(&actor.id, "user.delete", "user", id))
        .commit()?;
    info!(user_id = %id, "user deleted");
    Ok(())
}
