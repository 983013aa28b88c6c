//! Context passed to command handlers.
//!
//! Carries the route parameters, the parsed body, the caller's session and a
//! reference to the application. Handlers access everything they need
//! through the context.

use std::collections::HashMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use super::error::HandlerError;
use super::session::Session;
use crate::entities::Role;
use crate::pagination::PageRequest;
use crate::policy::Actor;

/// The context passed to every command handler.
///
/// Generic over `R`, the application type, so handlers can be written
/// against whichever store the service was built with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle<S: ModelStore>(ctx: &Context<App<S>>) -> Result<ApiResponse, HandlerError> {
///     let actor = ctx.actor()?;
///     let input = ctx.validated_input::<CreateQuestion>()?;
///     let question = questions::create(ctx.app(), &actor, input)?;
///     ApiResponse::created("question created", &question)
/// }
/// ```
pub struct Context<'a, R> {
    command_name: String,
    /// Path and query-string parameters.
    params: HashMap<String, String>,
    input: Value,
    session: Session,
    app: &'a R,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(
        command_name: String,
        params: HashMap<String, String>,
        input: Value,
        session: Session,
        app: &'a R,
    ) -> Self {
        Self {
            command_name,
            params,
            input,
            session,
            app,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone()).map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// Deserialize the input payload and run its `validator` constraints.
    pub fn validated_input<T: DeserializeOwned + Validate>(&self) -> Result<T, HandlerError> {
        let input: T = self.input()?;
        input.validate()?;
        Ok(input)
    }

    /// Get the raw JSON input.
    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    /// Get the command name.
    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// Get the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the user ID from the session. Returns `Unauthorized` if not present.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("authentication required".into()))
    }

    /// The authenticated caller, or `Unauthorized`.
    pub fn actor(&self) -> Result<Actor, HandlerError> {
        let id = self.user_id()?;
        let role = self
            .session
            .role()
            .map(Role::from_str)
            .transpose()
            .map_err(HandlerError::Unauthorized)?
            .unwrap_or_default();
        Ok(Actor::new(id, role))
    }

    /// The caller if authenticated, `None` for anonymous requests.
    pub fn optional_actor(&self) -> Option<Actor> {
        self.actor().ok()
    }

    pub fn app(&self) -> &R {
        self.app
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|v| v.as_str())
    }

    pub fn require_param(&self, name: &str) -> Result<&str, HandlerError> {
        self.param(name)
            .ok_or_else(|| HandlerError::DecodeFailed(format!("missing parameter: {}", name)))
    }

    /// Parse an optional parameter.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<Option<T>, HandlerError>
    where
        T::Err: std::fmt::Display,
    {
        self.param(name)
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| HandlerError::DecodeFailed(format!("parameter {}: {}", name, e)))
            })
            .transpose()
    }

    /// `page` and `limit` parameters as a validated request.
    pub fn page_request(&self) -> Result<PageRequest, HandlerError> {
        PageRequest::new(self.param_as("page")?, self.param_as("limit")?)
    }

    /// Check if the raw input contains a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some()
    }

    /// Check if the raw input contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
