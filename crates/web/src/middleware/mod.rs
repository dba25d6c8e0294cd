//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Method override (rewrites `POST ?_method=` before routing)
//! 2. Sentry layers (hub per request, transaction per route)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions, signed cookie)
//! 6. CSP nonce (generate per-request nonce for inline scripts)
//! 7. Security headers (CSP, frame options, etc.)
//! 8. Rate limiting on the auth form routes (governor)

pub mod auth;
pub mod context;
pub mod csp;
pub mod flash;
pub mod method_override;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAuth, RequireAuth, clear_current_user, current_user, set_current_user,
    take_return_to,
};
pub use context::PageContext;
pub use csp::{ContentSecurityPolicy, CspNonce, csp_nonce_middleware};
pub use flash::{Flash, flash_error, flash_success, take_flash};
pub use method_override::method_override;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
