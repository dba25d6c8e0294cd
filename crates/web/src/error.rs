//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error renders the `error.html` page with a non-empty message.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::middleware::PageContext;
use crate::services::auth::AuthError;
use crate::services::geocoding::GeocodeError;
use crate::services::images::ImageError;
use crate::services::validation::ValidationError;

/// Message shown for server-side failures.
pub const DEFAULT_MESSAGE: &str = "Oh No, Something Went Wrong!";

/// Message shown for unknown routes.
pub const NOT_FOUND_MESSAGE: &str = "Page not Found";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Image upload or removal failed.
    #[error("Image error: {0}")]
    Images(#[from] ImageError),

    /// Location lookup failed.
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Submitted form failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Auth(err) if err.is_user_error() => StatusCode::BAD_REQUEST,
            Self::Images(err) if err.is_user_error() => StatusCode::BAD_REQUEST,
            Self::Geocode(err) if err.is_user_error() => StatusCode::BAD_REQUEST,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the visitor.
    ///
    /// Server-side failures never leak their details.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            return DEFAULT_MESSAGE.to_string();
        }
        let message = match self {
            Self::Database(RepositoryError::NotFound) => NOT_FOUND_MESSAGE.to_string(),
            Self::Database(RepositoryError::Conflict(_)) => {
                "That already exists".to_string()
            }
            Self::Auth(err) => err.to_string(),
            Self::Images(err) => err.to_string(),
            Self::Geocode(err) => err.to_string(),
            _ => self.to_string(),
        };
        if message.trim().is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub ctx: PageContext,
    pub status: u16,
    pub message: String,
}

/// Render the error page, falling back to plain text if the template fails.
#[must_use]
pub fn render_error_page(status: StatusCode, message: String) -> Response {
    let template = ErrorTemplate {
        ctx: PageContext::bare(),
        status: status.as_u16(),
        message,
    };

    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            (status, template.message).into_response()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, %status, "Client error");
        }

        render_error_page(status, self.public_message())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after sign-in.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound(NOT_FOUND_MESSAGE.to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth(AuthError::UsernameTaken).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Auth(AuthError::PasswordHash).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Images(ImageError::UnsupportedFormat("a.gif".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Internal("connection refused on 10.0.0.3".to_string());
        assert_eq!(err.public_message(), DEFAULT_MESSAGE);

        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_string()));
        assert_eq!(err.public_message(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_empty_message_falls_back_to_default() {
        let err = AppError::BadRequest("   ".to_string());
        assert_eq!(err.public_message(), DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn test_into_response_renders_error_page() {
        let response = AppError::NotFound(NOT_FOUND_MESSAGE.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_text(response).await;
        assert!(body.contains("Page not Found"));
        assert!(body.contains("<html"));
    }

    #[tokio::test]
    async fn test_into_response_server_error() {
        let response = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(body.contains(DEFAULT_MESSAGE));
        assert!(!body.contains("secret detail"));
    }
}
