//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in user in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{Method, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash::flash_error;
use crate::models::{CurrentUser, session_keys};

/// Notice shown when a signed-out visitor hits a protected page.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in first!";

/// Extractor that requires a signed-in user.
///
/// Signed-out HTML requests are sent to `/login` with a flash message;
/// `GET` requests also remember where they were going.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response when no session layer is installed.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        if let Some(user) = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
        {
            return Ok(Self(user));
        }

        if parts.method == Method::GET
            && let Some(target) = parts.uri.path_and_query().map(ToString::to_string)
        {
            if let Err(e) = session.insert(session_keys::RETURN_TO, target).await {
                tracing::warn!(error = %e, "Failed to store return URL");
            }
        }
        flash_error(session, SIGN_IN_REQUIRED).await;

        Err(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Read the signed-in user from a session.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Sign a user in, cycling the session id first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

/// Take the remembered post-login destination.
///
/// Only same-site paths are honored; anything else falls back to
/// `/campgrounds`.
pub async fn take_return_to(session: &Session) -> String {
    let target = session
        .remove::<String>(session_keys::RETURN_TO)
        .await
        .ok()
        .flatten();

    match target {
        Some(path) if is_local_path(&path) => path,
        _ => "/campgrounds".to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/campgrounds/3/edit"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("https://evil.example"));
    }

    #[tokio::test]
    async fn test_take_return_to_defaults_and_clears() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(take_return_to(&session).await, "/campgrounds");

        session
            .insert(session_keys::RETURN_TO, "/campgrounds/new")
            .await
            .unwrap();
        assert_eq!(take_return_to(&session).await, "/campgrounds/new");
        assert_eq!(take_return_to(&session).await, "/campgrounds");
    }
}
