//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::services::geocoding::{GeocodeError, Geocoder};
use crate::services::images::{CloudinaryClient, ImageError};

/// Error building the external service clients.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("cloudinary client: {0}")]
    Images(#[from] ImageError),
    #[error("mapbox client: {0}")]
    Geocode(#[from] GeocodeError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: PgPool,
    images: CloudinaryClient,
    geocoder: Geocoder,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: WebConfig, pool: PgPool) -> Result<Self, StateError> {
        let images = CloudinaryClient::new(&config.cloudinary)?;
        let geocoder = Geocoder::new(&config.mapbox_token)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
                geocoder,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Cloudinary client.
    #[must_use]
    pub fn images(&self) -> &CloudinaryClient {
        &self.inner.images
    }

    /// Get a reference to the Mapbox geocoder.
    #[must_use]
    pub fn geocoder(&self) -> &Geocoder {
        &self.inner.geocoder
    }
}
