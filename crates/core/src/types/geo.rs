//! Geographic points.
//!
//! Campground locations are stored as longitude/latitude pairs and rendered
//! to the map as GeoJSON `Point` geometries (`[longitude, latitude]` order).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`GeoPoint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude {0} is out of range")]
    Longitude(f64),
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude {0} is out of range")]
    Latitude(f64),
    /// GeoJSON geometry that is not a `Point`.
    #[error("expected a GeoJSON Point, got {0}")]
    NotAPoint(String),
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Create a point, validating both coordinates.
    ///
    /// # Errors
    ///
    /// Returns a [`GeoError`] when either coordinate is out of range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude(longitude));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// GeoJSON coordinate pair.
    #[must_use]
    pub const fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

#[derive(Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GeoJsonPoint {
            kind: "Point".to_owned(),
            coordinates: self.coordinates(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = GeoJsonPoint::deserialize(deserializer)?;
        if raw.kind != "Point" {
            return Err(serde::de::Error::custom(GeoError::NotAPoint(raw.kind)));
        }
        let [longitude, latitude] = raw.coordinates;
        Self::new(longitude, latitude).map_err(serde::de::Error::custom)
    }
}
