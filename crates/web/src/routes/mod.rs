//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Landing page
//! GET  /health                            - Liveness
//! GET  /health/ready                      - Readiness (database ping)
//!
//! # Campgrounds
//! GET    /campgrounds                     - Listing + cluster map
//! POST   /campgrounds                     - Create (multipart, auth)
//! GET    /campgrounds/new                 - New form (auth)
//! GET    /campgrounds/{id}                - Detail, reviews, map
//! PUT    /campgrounds/{id}                - Update (multipart, author)
//! DELETE /campgrounds/{id}                - Delete (author)
//! GET    /campgrounds/{id}/edit           - Edit form (author)
//!
//! # Reviews
//! POST   /campgrounds/{id}/reviews        - Create (auth)
//! DELETE /campgrounds/{id}/reviews/{rid}  - Delete (review author)
//!
//! # Users
//! GET  /register, POST /register          - Sign up (POST rate limited)
//! GET  /login,    POST /login             - Sign in (POST rate limited)
//! POST /logout                            - Sign out
//!
//! # Development only
//! GET  /fakeuser                          - Throwaway account
//! ```

pub mod campgrounds;
pub mod dev;
pub mod health;
pub mod home;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use crate::error::{AppError, NOT_FOUND_MESSAGE};
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Largest multipart body accepted by the campground forms (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the campground and review routes router.
pub fn campground_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campgrounds::index)
                .post(campgrounds::create)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/new", get(campgrounds::new_page))
        .route(
            "/{id}",
            get(campgrounds::show)
                .put(campgrounds::update)
                .delete(campgrounds::delete)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/{id}/edit", get(campgrounds::edit_page))
        .route("/{id}/reviews", post(reviews::create))
        .route("/{id}/reviews/{review_id}", delete(reviews::delete))
}

/// Create the registration and login routes router.
///
/// `trust_proxy` decides whether the rate limiter keys on proxy headers.
pub fn user_routes(trust_proxy: bool) -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            get(users::register_page)
                .merge(post(users::register).layer(auth_rate_limiter(trust_proxy))),
        )
        .route(
            "/login",
            get(users::login_page).merge(post(users::login).layer(auth_rate_limiter(trust_proxy))),
        )
        .route("/logout", post(users::logout))
}

/// Create all page routes.
///
/// `/fakeuser` is only mounted when `include_dev_routes` is set.
pub fn routes(include_dev_routes: bool, trust_proxy: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/campgrounds", campground_routes())
        .merge(user_routes(trust_proxy));

    if include_dev_routes {
        router.route("/fakeuser", get(dev::fake_user))
    } else {
        router
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    AppError::NotFound(NOT_FOUND_MESSAGE.to_string()).into_response()
}
