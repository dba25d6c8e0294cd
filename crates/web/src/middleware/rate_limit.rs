//! Rate limiting for the sign-in and registration forms.
//!
//! Clients are keyed by the socket peer address recorded by
//! `into_make_service_with_connect_info`. Behind a reverse proxy
//! (`TRUST_PROXY=true`) the proxy's headers name the client instead.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Headers a single trusted proxy sets, checked in order.
const FORWARDED_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "fly-client-ip"];

/// Key extractor for the client IP.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }

    fn forwarded_ip<T>(req: &Request<T>) -> Option<IpAddr> {
        let headers = req.headers();
        FORWARDED_HEADERS.iter().find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                // The proxy appends the address it saw; earlier entries are client-supplied
                .and_then(|s| s.rsplit(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let forwarded = if self.trust_proxy {
            Self::forwarded_ip(req)
        } else {
            None
        };

        forwarded
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. `per_second(6)` and `burst_size(5)` are
/// non-zero, which is all `GovernorConfigBuilder` checks.
#[must_use]
#[allow(clippy::expect_used)]
pub fn auth_rate_limiter(trust_proxy: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy))
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn peer(req: &mut Request<Body>, addr: &str) {
        req.extensions_mut()
            .insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
    }

    #[test]
    fn test_ignores_forwarded_for_by_default() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        peer(&mut req, "192.0.2.9:5000");
        assert_eq!(
            ClientIpKeyExtractor::new(false).extract(&req).unwrap(),
            "192.0.2.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_trusted_proxy_uses_last_forwarded_entry() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "1.2.3.4, 203.0.113.7")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        peer(&mut req, "10.0.0.1:5000");
        assert_eq!(
            ClientIpKeyExtractor::new(true).extract(&req).unwrap(),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_trusted_proxy_without_headers_uses_peer() {
        let mut req = Request::builder().body(Body::empty()).unwrap();
        peer(&mut req, "10.0.0.1:5000");
        assert_eq!(
            ClientIpKeyExtractor::new(true).extract(&req).unwrap(),
            "10.0.0.1".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_no_address_is_an_error() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        assert!(ClientIpKeyExtractor::new(false).extract(&req).is_err());
    }
}
