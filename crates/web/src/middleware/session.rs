//! Session middleware configuration.
//!
//! Sessions are stored server-side (`PostgreSQL` in production) and the
//! cookie only carries a signed session id.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "__ui_s";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Derive the 64-byte cookie signing key from the configured secret.
#[must_use]
pub fn signing_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Create the session layer over `store`.
///
/// The cookie is marked `Secure` when the site is served over https.
#[must_use]
pub fn create_session_layer<Store: SessionStore>(
    store: Store,
    config: &WebConfig,
) -> SessionManagerLayer<Store, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.uses_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic() {
        let a = signing_key(&SecretString::from("k9#Lm2$vQ8@nR4&wT6*yU1!pX3^zA7%b"));
        let b = signing_key(&SecretString::from("k9#Lm2$vQ8@nR4&wT6*yU1!pX3^zA7%b"));
        let c = signing_key(&SecretString::from("a-different-secret-with-entropy!"));
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
