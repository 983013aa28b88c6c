//! Service: command handler registry and dispatch.
//!
//! `Service<R>` holds the application and a set of named command handlers.
//! Each handler receives a `Context<R>` and returns an [`ApiResponse`] or a
//! [`HandlerError`]. Transports (HTTP, tests) only ever call `dispatch`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::context::Context;
use super::error::HandlerError;
use super::response::ApiResponse;
use super::session::Session;

type Guard<R> = Box<dyn Fn(&Context<R>) -> bool + Send + Sync>;
type Handle<R> = Box<dyn Fn(&Context<R>) -> Result<ApiResponse, HandlerError> + Send + Sync>;

/// A registered command handler with optional guard.
struct CommandHandler<R> {
    guard: Option<Guard<R>>,
    handle: Handle<R>,
}

/// Routes command names to handler functions.
pub struct Service<R> {
    app: R,
    handlers: HashMap<String, CommandHandler<R>>,
}

impl<R: Send + Sync + 'static> Service<R> {
    pub fn new(app: R) -> Self {
        Self {
            app,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler.
    ///
    /// Builder style: returns `self` for chaining.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<R>) -> Result<ApiResponse, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard is called before the handler. If it returns `false`,
    /// the command is rejected with `HandlerError::GuardRejected`.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<R>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<R>) -> Result<ApiResponse, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command that takes no route parameters.
    pub fn dispatch(&self, command: &str, input: Value, session: Session) -> Result<ApiResponse, HandlerError> {
        self.dispatch_with(command, HashMap::new(), input, session)
    }

    /// Dispatch a command by name.
    ///
    /// Builds a `Context`, looks up the handler, runs the guard (if any),
    /// then calls the handler. Failures are logged here so every transport
    /// reports them the same way.
    pub fn dispatch_with(
        &self,
        command: &str,
        params: HashMap<String, String>,
        input: Value,
        session: Session,
    ) -> Result<ApiResponse, HandlerError> {
        let result = self.run(command, params, input, session);
        match &result {
            Ok(response) => debug!(command, status = response.status, "command handled"),
            Err(e) if e.is_server_error() => error!(command, error = %e, "command failed"),
            Err(e) => warn!(command, status = e.status_code(), error = %e, "command rejected"),
        }
        result
    }

    fn run(
        &self,
        command: &str,
        params: HashMap<String, String>,
        input: Value,
        session: Session,
    ) -> Result<ApiResponse, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command.to_string(), params, input, session, &self.app);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        (handler.handle)(&ctx)
    }

    /// List registered command names.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn app(&self) -> &R {
        &self.app
    }
}
