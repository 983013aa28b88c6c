//! Registration and login.

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::api::HandlerError;
use crate::app::App;
use crate::auth::verify_password;
use crate::entities::{Role, User, UserView};
use crate::model::ModelStore;
use crate::policy::Actor;

use super::users;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: UserView,
    pub access_token: String,
}

fn session<S: ModelStore>(app: &App<S>, user: User) -> Result<AuthSession, HandlerError> {
    let access_token = app
        .tokens()
        .issue(&user)
        .map_err(|e| HandlerError::Internal(e.to_string()))?;
    Ok(AuthSession {
        access_token,
        user: user.view(),
    })
}

pub fn register<S: ModelStore>(app: &App<S>, input: RegisterInput) -> Result<AuthSession, HandlerError> {
    let user = users::create(app, &input.name, &input.email, &input.password, Role::User)?;
    session(app, user)
}

pub fn login<S: ModelStore>(app: &App<S>, input: LoginInput) -> Result<AuthSession, HandlerError> {
    let invalid = || HandlerError::Unauthorized("invalid email or password".into());

    let user = users::find_by_email(app, &input.email)?.ok_or_else(invalid)?;
    if !verify_password(&input.password, &user.password_hash) {
        return Err(invalid());
    }
    if !user.is_active {
        return Err(HandlerError::Unauthorized("account is deactivated".into()));
    }

    info!(user_id = %user.id, "user logged in");
    session(app, user)
}

pub fn me<S: ModelStore>(app: &App<S>, actor: &Actor) -> Result<UserView, HandlerError> {
    Ok(users::get(app, &actor.id)?.view())
}
