//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DB_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `CLOUDINARY_CLOUD_NAME` - Cloudinary cloud name
//! - `CLOUDINARY_KEY` - Cloudinary API key
//! - `CLOUDINARY_SECRET` - Cloudinary API secret
//! - `MAPBOX_TOKEN` - Mapbox access token (geocoding and map tiles)
//!
//! ## Optional
//! - `APP_ENV` - `development` or `production` (falls back to `NODE_ENV`, default: development)
//! - `HOST` - Bind address (default: 127.0.0.1)
//! - `PORT` - Listen port (default: 3030)
//! - `BASE_URL` - Public URL (default: <http://localhost:3030>)
//! - `CLOUDINARY_FOLDER` - Upload folder (default: `YelpCamp`)
//! - `STATIC_DIR` - Directory served under `/static` (default: the crate's `static/`)
//! - `TRUST_PROXY` - `true` when behind a reverse proxy that sets `X-Forwarded-For` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default Cloudinary folder for campground uploads.
pub const DEFAULT_CLOUDINARY_FOLDER: &str = "YelpCamp";

/// Static assets in the source checkout, used when `STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secretcode",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Read `APP_ENV`, falling back to `NODE_ENV` for older deploy scripts.
    ///
    /// Anything other than `production` is treated as development.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = get_optional_env("APP_ENV").or_else(|| get_optional_env("NODE_ENV"));
        Self::parse(raw.as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Deployment environment
    pub environment: Environment,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Image CDN configuration
    pub cloudinary: CloudinaryConfig,
    /// Mapbox access token (also sent to browsers for map tiles)
    pub mapbox_token: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Whether proxy headers identify the client for rate limiting
    pub trust_proxy: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Cloudinary image CDN configuration.
///
/// Implements `Debug` manually to redact the API secret.
#[derive(Clone)]
pub struct CloudinaryConfig {
    /// Cloud name (first path segment of every asset URL)
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret used to sign upload/destroy requests
    pub api_secret: SecretString,
    /// Folder uploads are stored under
    pub folder: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}

impl CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: get_required_env("CLOUDINARY_CLOUD_NAME")?,
            api_key: get_required_env("CLOUDINARY_KEY")?,
            api_secret: get_required_secret("CLOUDINARY_SECRET")?,
            folder: get_env_or_default("CLOUDINARY_FOLDER", DEFAULT_CLOUDINARY_FOLDER),
        })
    }

    /// Base URL every delivered asset for this cloud starts with.
    #[must_use]
    pub fn delivery_prefix(&self) -> String {
        format!("https://res.cloudinary.com/{}/", self.cloud_name)
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Outside production, calls `dotenvy::dotenv()` first so a local `.env`
    /// file can supply values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        if !environment.is_production() {
            let _ = dotenvy::dotenv();
        }
        // Re-read in case .env set APP_ENV
        let environment = Environment::from_env();

        let database_url = get_database_url("DB_URL")?;
        let host = get_env_or_default("HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3030")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("BASE_URL", "http://localhost:3030");
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BASE_URL".to_string(), e.to_string()))?;

        let session_secret = get_validated_secret("SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SESSION_SECRET")?;

        let cloudinary = CloudinaryConfig::from_env()?;
        let mapbox_token = get_required_env("MAPBOX_TOKEN")?;
        let static_dir = PathBuf::from(get_env_or_default("STATIC_DIR", DEFAULT_STATIC_DIR));
        let trust_proxy = parse_flag(get_optional_env("TRUST_PROXY").as_deref())
            .map_err(|v| ConfigError::InvalidEnvVar("TRUST_PROXY".to_string(), v))?;

        Ok(Self {
            environment,
            database_url,
            host,
            port,
            base_url,
            session_secret,
            cloudinary,
            mapbox_token,
            static_dir,
            trust_proxy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT")
                .or_else(|| Some(environment.as_str().to_owned())),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn uses_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag; unset means `false`.
fn parse_flag(raw: Option<&str>) -> Result<bool, String> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("false" | "0" | "no") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some(other) => Err(format!("expected true or false, got {other:?}")),
    }
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_config() -> WebConfig {
        WebConfig {
            environment: Environment::Development,
            database_url: SecretString::from("postgres://localhost/yelpcamp"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3030,
            base_url: "http://localhost:3030".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            cloudinary: CloudinaryConfig {
                cloud_name: "dyq8h16eb".to_string(),
                api_key: "123456789012345".to_string(),
                api_secret: SecretString::from("cloudinary_api_secret_value"),
                folder: DEFAULT_CLOUDINARY_FOLDER.to_string(),
            },
            mapbox_token: "pk.test".to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            trust_proxy: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_rejects_old_hardcoded_secret() {
        let result = validate_secret_strength("secretcode", "SESSION_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "SESSION_SECRET").is_err());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse(None), Environment::Development);
        assert_eq!(
            Environment::parse(Some("Production")),
            Environment::Production
        );
        assert_eq!(Environment::parse(Some("staging")), Environment::Development);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(None), Ok(false));
        assert_eq!(parse_flag(Some("TRUE")), Ok(true));
        assert_eq!(parse_flag(Some(" 0 ")), Ok(false));
        assert!(parse_flag(Some("maybe")).is_err());
    }

    #[test]
    fn test_default_static_dir_is_the_crate_assets() {
        assert!(DEFAULT_STATIC_DIR.ends_with("/static"));
        assert!(std::path::Path::new(DEFAULT_STATIC_DIR).join("js").is_dir());
    }

    #[test]
    fn test_socket_addr() {
        let addr = sample_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3030);
    }

    #[test]
    fn test_uses_https() {
        let mut config = sample_config();
        assert!(!config.uses_https());
        config.base_url = "https://yelpcamp.example".to_string();
        assert!(config.uses_https());
    }

    #[test]
    fn test_cloudinary_delivery_prefix() {
        assert_eq!(
            sample_config().cloudinary.delivery_prefix(),
            "https://res.cloudinary.com/dyq8h16eb/"
        );
    }

    #[test]
    fn test_cloudinary_debug_redacts_secret() {
        let debug_output = format!("{:?}", sample_config().cloudinary);
        assert!(debug_output.contains("dyq8h16eb"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cloudinary_api_secret_value"));
    }
}
