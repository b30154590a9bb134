/*!
 * Management API.
 *
 * Publishes the adapter type descriptors under
 * `/api/v1/management/protocol-adapters/types`.
 */
use std::any::Any;

use axum::extract::State;
use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use edgeflow_core::error::panic_message;
use edgeflow_schema::AdapterDescriptor;
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, error};

use crate::server::AppState;

/// Path of the adapter type listing
pub const ADAPTER_TYPES_PATH: &str = "/api/v1/management/protocol-adapters/types";

#[derive(Debug, Serialize)]
struct ItemsResponse<'a> {
    items: &'a [AdapterDescriptor],
}

/// Routes of the management API, with CORS headers on every response
pub fn router() -> Router<AppState> {
    // `get` would also answer HEAD
    let method_router = get(list_adapter_types)
        .head(method_not_allowed)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new().route(ADAPTER_TYPES_PATH, method_router).layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, OPTIONS"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            ))
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

/// List every adapter type the registry knows
pub async fn list_adapter_types(State(state): State<AppState>) -> Response {
    let registry = state.registry();
    let listing = tokio::task::spawn_blocking(move || registry.list_descriptors()).await;

    let descriptors = match listing {
        Ok(Ok(descriptors)) => descriptors,
        Ok(Err(e)) => return internal_error(e.to_string()),
        Err(e) if e.is_panic() => return internal_error(panic_message(e.into_panic().as_ref())),
        Err(e) => return internal_error(e.to_string()),
    };

    match serde_json::to_vec_pretty(&ItemsResponse {
        items: descriptors.as_slice(),
    }) {
        Ok(body) => {
            debug!("Serving {} adapter type(s)", descriptors.len());
            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => internal_error(e.to_string()),
    }
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn internal_error(message: String) -> Response {
    error!("Failed to list adapter types: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("Internal server error: {}", message) })),
    )
        .into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    internal_error(panic_message(payload.as_ref()))
}
