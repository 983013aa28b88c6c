//! HTTP transport: maps the route table onto command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! Each request becomes one `dispatch_with` call: path and query parameters
//! become context params, the JSON body (or `{}`) becomes the input, and a
//! verified `Authorization: Bearer` token becomes the session. No other
//! header reaches the session.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::error::HandlerError;
use super::response::ApiResponse;
use super::routes::ROUTES;
use super::service::Service;
use super::session::Session;
use super::Authenticator;

type SharedService<R> = Arc<Service<R>>;

fn method_filter(method: &str) -> MethodFilter {
    match method {
        "POST" => MethodFilter::POST,
        "PUT" => MethodFilter::PUT,
        "PATCH" => MethodFilter::PATCH,
        "DELETE" => MethodFilter::DELETE,
        _ => MethodFilter::GET,
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// Build an axum `Router` serving every route in the table.
pub fn router<R>(service: SharedService<R>) -> Router
where
    R: Authenticator + Send + Sync + 'static,
{
    let mut by_path: BTreeMap<&'static str, MethodRouter<SharedService<R>>> = BTreeMap::new();
    for route in ROUTES {
        let command = route.command;
        let handler = move |State(service): State<SharedService<R>>,
                            path: Option<Path<HashMap<String, String>>>,
                            Query(query): Query<HashMap<String, String>>,
                            headers: HeaderMap,
                            body: Bytes| async move {
            let mut params = query;
            if let Some(Path(path)) = path {
                params.extend(path);
            }
            endpoint(service, command, params, headers, body).await
        };
        let filter = method_filter(route.method);
        let method_router = match by_path.remove(route.path) {
            Some(existing) => existing.on(filter, handler),
            None => on(filter, handler),
        };
        by_path.insert(route.path, method_router);
    }

    let mut router = Router::new();
    for (path, method_router) in by_path {
        router = router.route(path, method_router);
    }
    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(service)
}

/// Serve until `shutdown` resolves.
pub async fn serve<R>(
    service: SharedService<R>,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error>
where
    R: Authenticator + Send + Sync + 'static,
{
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

fn reply(response: ApiResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

fn reject(err: HandlerError) -> Response {
    reply(ApiResponse::error(&err))
}

/// `Authorization: Bearer <token>` → session. No header means anonymous;
/// a header that does not verify is rejected outright.
fn session_from_headers<R: Authenticator>(app: &R, headers: &HeaderMap) -> Result<Session, HandlerError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(Session::new());
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| HandlerError::Unauthorized("expected a bearer token".into()))?;
    app.authenticate(token)
}

async fn endpoint<R>(
    service: SharedService<R>,
    command: &'static str,
    params: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: Authenticator + Send + Sync + 'static,
{
    let input: Value = if body.is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => return reject(HandlerError::from(e)),
        }
    };

    // Store access and record locks are blocking.
    let outcome = tokio::task::spawn_blocking(move || {
        let session = session_from_headers(service.app(), &headers)?;
        service.dispatch_with(command, params, input, session)
    })
    .await;

    match outcome {
        Ok(Ok(response)) => reply(response),
        Ok(Err(e)) => reject(e),
        Err(e) => {
            error!(command, error = %e, "handler task failed");
            reply(ApiResponse {
                success: false,
                message: Some("internal server error".into()),
                data: None,
                pagination: None,
                status: 500,
            })
        }
    }
}

async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    reject(HandlerError::UnknownCommand(uri.path().to_string()))
}
