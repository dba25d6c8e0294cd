//! YelpCamp web library.
//!
//! The server binary, the CLI and the router tests all build on this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seeds;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
};
use tower::util::MapRequest;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};

use middleware::{
    ContentSecurityPolicy, csp_nonce_middleware, method_override, request_id_middleware,
    security_headers_middleware,
};
use state::AppState;

/// The router wrapped in the method-override rewrite.
pub type AppService = MapRequest<Router, fn(Request) -> Request>;

/// Build the router with every page route and middleware layer.
///
/// The session store is a parameter so tests can use an in-memory store.
pub fn build_router<Store>(
    state: AppState,
    session_layer: SessionManagerLayer<Store, SignedCookie>,
) -> Router
where
    Store: SessionStore + Clone,
{
    let policy = Arc::new(ContentSecurityPolicy::new(
        state.config().cloudinary.delivery_prefix(),
    ));
    let include_dev_routes = !state.config().environment.is_production();
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes(include_dev_routes, state.config().trust_proxy))
        .nest_service("/static", static_files)
        .fallback(routes::not_found)
        .layer(from_fn_with_state(policy, security_headers_middleware))
        .layer(from_fn(csp_nonce_middleware))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Rewrite `POST ?_method=` requests before they reach the router.
///
/// Routing happens inside [`Router`], so the rewrite has to wrap it rather
/// than be one of its layers.
pub fn with_method_override(router: Router) -> AppService {
    tower::ServiceExt::map_request(router, method_override as fn(Request) -> Request)
}
