//! Content Security Policy.
//!
//! Each request gets a random nonce that authorizes the page's own inline
//! scripts (the map bootstraps). External hosts are allowed per directive
//! from a fixed list, plus the configured Cloudinary cloud for images.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Script hosts: Bootstrap, Mapbox GL, Font Awesome, cdnjs, jsDelivr.
const SCRIPT_SRC: &[&str] = &[
    "https://stackpath.bootstrapcdn.com/",
    "https://api.tiles.mapbox.com/",
    "https://api.mapbox.com/",
    "https://kit.fontawesome.com/",
    "https://cdnjs.cloudflare.com/",
    "https://cdn.jsdelivr.net",
];

const STYLE_SRC: &[&str] = &[
    "https://kit-free.fontawesome.com/",
    "https://stackpath.bootstrapcdn.com/",
    "https://api.mapbox.com/",
    "https://api.tiles.mapbox.com/",
    "https://fonts.googleapis.com/",
    "https://use.fontawesome.com/",
    "https://cdn.jsdelivr.net",
];

const CONNECT_SRC: &[&str] = &[
    "https://api.mapbox.com/",
    "https://events.mapbox.com/",
    "https://*.tiles.mapbox.com/",
    "https://cdn.jsdelivr.net",
];

const FONT_SRC: &[&str] = &[
    "https://fonts.gstatic.com/",
    "https://use.fontawesome.com/",
    "https://cdn.jsdelivr.net",
    "data:",
];

const IMG_SRC: &[&str] = &[
    "blob:",
    "data:",
    "https://images.unsplash.com/",
    "https://images.pexels.com/",
    "https://*.tiles.mapbox.com/",
];

/// A CSP nonce value for inline scripts.
///
/// Each request gets a unique, cryptographically random nonce (128-bit, base64-encoded).
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// Get the nonce value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Middleware that generates a CSP nonce and stores it in request extensions.
///
/// Must wrap `security_headers_middleware` so the nonce is available when
/// building the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!(
                "CSP nonce not found in request extensions - middleware may be misconfigured"
            );
            Self(String::new())
        }))
    }
}

/// The site's policy, minus the per-request nonce.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicy {
    cloudinary_prefix: String,
}

impl ContentSecurityPolicy {
    /// Build the policy for a Cloudinary delivery prefix such as
    /// `https://res.cloudinary.com/demo/`.
    #[must_use]
    pub fn new(cloudinary_prefix: impl Into<String>) -> Self {
        Self {
            cloudinary_prefix: cloudinary_prefix.into(),
        }
    }

    /// Render the header value with `nonce` authorizing inline scripts.
    ///
    /// An empty nonce is left out rather than emitted as `'nonce-'`.
    #[must_use]
    pub fn header_value(&self, nonce: &str) -> String {
        let mut script_src = vec!["'self'".to_string()];
        if !nonce.is_empty() {
            script_src.push(format!("'nonce-{nonce}'"));
        }
        script_src.extend(SCRIPT_SRC.iter().map(ToString::to_string));

        let mut img_src = vec!["'self'".to_string()];
        img_src.extend(IMG_SRC.iter().map(ToString::to_string));
        img_src.push(self.cloudinary_prefix.clone());

        let directives = [
            ("default-src", vec!["'self'".to_string()]),
            ("base-uri", vec!["'self'".to_string()]),
            ("form-action", vec!["'self'".to_string()]),
            ("object-src", vec!["'none'".to_string()]),
            ("frame-ancestors", vec!["'none'".to_string()]),
            ("script-src", script_src),
            ("style-src", with_self(&["'unsafe-inline'"], STYLE_SRC)),
            ("connect-src", with_self(&[], CONNECT_SRC)),
            ("img-src", img_src),
            ("worker-src", vec!["'self'".to_string(), "blob:".to_string()]),
            ("font-src", with_self(&[], FONT_SRC)),
        ];

        let mut policy = directives
            .iter()
            .map(|(name, sources)| format!("{name} {}", sources.join(" ")))
            .collect::<Vec<_>>()
            .join("; ");
        policy.push_str("; upgrade-insecure-requests");
        policy
    }
}

fn with_self(keywords: &[&str], hosts: &[&str]) -> Vec<String> {
    std::iter::once("'self'")
        .chain(keywords.iter().copied())
        .chain(hosts.iter().copied())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_is_random_base64() {
        let a = CspNonce::generate();
        let b = CspNonce::generate();
        assert_ne!(a.value(), b.value());
        assert_eq!(a.value().len(), 24);
    }

    #[test]
    fn test_header_value_includes_nonce_and_cloud() {
        let policy = ContentSecurityPolicy::new("https://res.cloudinary.com/demo/");
        let header = policy.header_value("abc123");

        assert!(header.contains("script-src 'self' 'nonce-abc123' https://stackpath.bootstrapcdn.com/"));
        assert!(header.contains("https://res.cloudinary.com/demo/"));
        assert!(header.contains("worker-src 'self' blob:"));
        assert!(header.contains("object-src 'none'"));
        assert!(header.ends_with("upgrade-insecure-requests"));
    }

    #[test]
    fn test_header_value_without_nonce() {
        let header = ContentSecurityPolicy::new("https://res.cloudinary.com/demo/").header_value("");
        assert!(!header.contains("'nonce-"));
        assert!(header.contains("script-src 'self' https://"));
    }

    #[test]
    fn test_style_src_allows_inline() {
        let header = ContentSecurityPolicy::new("x").header_value("n");
        assert!(header.contains("style-src 'self' 'unsafe-inline' https://kit-free.fontawesome.com/"));
    }
}
