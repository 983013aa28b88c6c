//! api: command handlers and their transports.
//!
//! Every operation is a named command registered on a [`Service`]. A handler
//! receives a [`Context`] carrying the decoded input, path/query params, the
//! caller's [`Session`] and the application state, and returns an
//! [`ApiResponse`] envelope.
//!
//! ```ignore
//! use blogqa::{api::handlers, App, Config, Session};
//! use serde_json::json;
//!
//! let service = handlers::service(App::in_memory(Config::default()));
//! let response = service.dispatch(
//!     "auth.register",
//!     json!({ "name": "Ada", "email": "ada@example.com", "password": "password123" }),
//!     Session::new(),
//! )?;
//!
//! // HTTP transport (requires "http" feature)
//! // blogqa::api::serve(Arc::new(service), "0.0.0.0:3000", shutdown).await?;
//! ```
//!
//! ## Handler Convention
//!
//! ```ignore
//! pub mod create {
//!     pub const COMMAND: &str = "question.create";
//!
//!     pub use crate::api::handlers::always as guard;
//!
//!     pub fn handle<S: ModelStore>(ctx: &Ctx<S>) -> Result<ApiResponse, HandlerError> {
//!         let input: CreateQuestion = ctx.validated_input()?;
//!         let question = questions::create(ctx.app(), &ctx.actor()?, input)?;
//!         ApiResponse::created("question created", &question)
//!     }
//! }
//! ```

mod context;
mod error;
pub mod handlers;
mod response;
mod routes;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use response::ApiResponse;
pub use routes::{Route, ROUTES};
pub use service::Service;
pub use session::Session;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Turns a bearer token into a session. Implemented by [`App`](crate::App).
pub trait Authenticator {
    fn authenticate(&self, token: &str) -> Result<Session, HandlerError>;
}

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str`: the command name
/// - `guard(ctx) -> bool`: input pre-check
/// - `handle(ctx) -> Result<ApiResponse, HandlerError>`: the handler
///
/// # Example
/// ```ignore
/// let service = blogqa::register_handlers!(
///     Service::new(app),
///     handlers::system::health,
///     handlers::questions::create,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
