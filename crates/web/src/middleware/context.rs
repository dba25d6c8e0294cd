//! Per-page template context.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use yelpcamp_core::UserId;

use super::auth::current_user;
use super::csp::CspNonce;
use super::flash::{Flash, take_flash};
use crate::models::CurrentUser;
use crate::state::AppState;

/// What every page template needs besides its own data: the signed-in
/// user, pending flash messages, the CSP nonce and the public map token.
///
/// Extracting it consumes the pending flash messages.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub current_user: Option<CurrentUser>,
    pub flash: Flash,
    pub nonce: String,
    pub mapbox_token: String,
}

impl PageContext {
    /// Context for pages rendered outside a handler, such as error pages.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// Whether `user_id` is the signed-in user.
    #[must_use]
    pub fn is_user(&self, user_id: &UserId) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|user| user.id == *user_id)
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let nonce = CspNonce::from_request_parts(parts, state).await?;

        let (current_user, flash) = match parts.extensions.get::<Session>() {
            Some(session) => (current_user(session).await, take_flash(session).await),
            None => (None, Flash::default()),
        };

        Ok(Self {
            current_user,
            flash,
            nonce: nonce.0,
            mapbox_token: state.config().mapbox_token.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yelpcamp_core::{Email, Username};

    use super::*;

    fn signed_in(id: i32) -> PageContext {
        PageContext {
            current_user: Some(CurrentUser {
                id: UserId::new(id),
                username: Username::parse("colt").unwrap(),
                email: Email::parse("colt@example.com").unwrap(),
            }),
            ..PageContext::default()
        }
    }

    #[test]
    fn test_is_user_matches_only_the_signed_in_id() {
        let ctx = signed_in(7);
        assert!(ctx.is_user(&UserId::new(7)));
        assert!(!ctx.is_user(&UserId::new(8)));
    }

    #[test]
    fn test_anonymous_is_never_the_user() {
        assert!(!PageContext::bare().is_user(&UserId::new(7)));
    }
}
