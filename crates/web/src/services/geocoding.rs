//! Forward geocoding through the Mapbox Places API.
//!
//! Lookups are cached in-process for a day, keyed by the normalized query.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use yelpcamp_core::{GeoError, GeoPoint};

/// Mapbox geocoding endpoint.
const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Errors that can occur when geocoding a location.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Mapbox returned no features for the query.
    #[error("Could not find a place called \"{0}\"")]
    NoMatch(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The returned coordinates were out of range.
    #[error("invalid coordinates from geocoder: {0}")]
    InvalidPoint(#[from] GeoError),
}

impl GeocodeError {
    /// Whether the failure was caused by the location the user typed.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::NoMatch(_))
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: [f64; 2],
}

/// Mapbox geocoding client.
#[derive(Clone)]
pub struct Geocoder {
    inner: Arc<GeocoderInner>,
}

struct GeocoderInner {
    client: reqwest::Client,
    access_token: String,
    cache: Cache<String, GeoPoint>,
}

impl Geocoder {
    /// Create a new geocoder.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(access_token: &str) -> Result<Self, GeocodeError> {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(GeocoderInner {
                client,
                access_token: access_token.to_string(),
                cache,
            }),
        })
    }

    /// Resolve a free-text location to its best-matching point.
    ///
    /// # Errors
    ///
    /// Returns `GeocodeError::NoMatch` if Mapbox finds nothing, or the
    /// underlying transport error.
    #[tracing::instrument(skip(self))]
    pub async fn forward(&self, location: &str) -> Result<GeoPoint, GeocodeError> {
        let key = cache_key(location);

        if let Some(point) = self.inner.cache.get(&key).await {
            debug!("Cache hit for geocode");
            return Ok(point);
        }

        let url = format!("{BASE_URL}/{}.json", urlencoding::encode(location.trim()));
        let response = self
            .inner
            .client
            .get(&url)
            .query(&[("access_token", self.inner.access_token.as_str()), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: FeatureCollection = response.json().await?;
        let point = first_point(body, location)?;

        self.inner.cache.insert(key, point).await;
        Ok(point)
    }
}

fn cache_key(location: &str) -> String {
    location
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn first_point(body: FeatureCollection, location: &str) -> Result<GeoPoint, GeocodeError> {
    let feature = body
        .features
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(location.trim().to_string()))?;

    let [longitude, latitude] = feature.geometry.coordinates;
    Ok(GeoPoint::new(longitude, latitude)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_normalizes() {
        assert_eq!(cache_key("  Moab,   UTAH "), "moab, utah");
        assert_eq!(cache_key("Moab, Utah"), cache_key("moab,  utah"));
    }

    #[test]
    fn test_first_point_reads_longitude_then_latitude() {
        let body: FeatureCollection = serde_json::from_str(
            r#"{"type":"FeatureCollection","features":[
                {"geometry":{"type":"Point","coordinates":[-109.55,38.57]}},
                {"geometry":{"type":"Point","coordinates":[0.0,0.0]}}
            ]}"#,
        )
        .unwrap();

        let point = first_point(body, "Moab").unwrap();
        assert!((point.longitude() - -109.55).abs() < f64::EPSILON);
        assert!((point.latitude() - 38.57).abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_point_no_features() {
        let body: FeatureCollection = serde_json::from_str(r#"{"features":[]}"#).unwrap();
        let err = first_point(body, " Atlantis ").unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Could not find a place called \"Atlantis\"");
    }

    #[test]
    fn test_first_point_out_of_range() {
        let body: FeatureCollection =
            serde_json::from_str(r#"{"features":[{"geometry":{"coordinates":[200.0,0.0]}}]}"#)
                .unwrap();
        assert!(matches!(
            first_point(body, "x"),
            Err(GeocodeError::InvalidPoint(_))
        ));
    }
}
