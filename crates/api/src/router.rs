//! Shared application router builder.
//!
//! [`build_app_router`] is called by the binary (`main.rs`) and by the
//! integration tests (`tests/common/mod.rs`), so requests in tests pass
//! through the same middleware as in production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Header carrying the per-request correlation id.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Methods the frontend uses against the resource routes.
const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// How long browsers may cache a preflight response.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the full application [`Router`]: `/health` at the root, every
/// resource under `/api`, wrapped in the middleware stack.
///
/// Configuration is read from `state.config`.
pub fn build_app_router(state: AppState) -> Router {
    let config = state.config.clone();

    let app = Router::new()
        // Health stays outside /api so probes need no token.
        .merge(routes::health::router())
        .nest("/api", routes::api_routes());

    with_middleware(app, &config).with_state(state)
}

/// Wrap `app` in the middleware stack, listed outermost first:
///
/// 1. CORS
/// 2. Assign an `x-request-id` to incoming requests
/// 3. Request/response tracing (the span carries the request id)
/// 4. Copy the request id onto the response
/// 5. Timeout, answered with 408
/// 6. Panic recovery, answered with 500
fn with_middleware(app: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.request_timeout_secs),
            ))
            .layer(CatchPanicLayer::new()),
    )
    // Applied last so it wraps everything above (outermost); Router::layer
    // boxes the inner body, which satisfies Cors's `ResBody: Default` bound.
    .layer(cors_layer(&config.cors_origins))
}

/// Build the CORS layer for the configured origins.
///
/// # Panics
///
/// Panics at startup if an origin is not a valid header value, so a typo in
/// `CORS_ORIGINS` stops the server instead of silently blocking the frontend.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
