//! Coordinates and great-circle distance.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a point from the raw `latitude` / `longitude` values of a location report.
    ///
    /// Each value may be a JSON number or a numeric string. Both must be finite
    /// and inside the valid degree ranges.
    pub fn from_report(
        latitude: Option<&Value>,
        longitude: Option<&Value>,
    ) -> Result<Self, AppError> {
        let lat = latitude.and_then(parse_coordinate);
        let lon = longitude.and_then(parse_coordinate);

        match (lat, lon) {
            (Some(lat), Some(lon))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) =>
            {
                Ok(Self::new(lat, lon))
            }
            _ => {
                tracing::warn!(
                    "Rejected location report: latitude={:?}, longitude={:?}",
                    latitude,
                    longitude
                );
                Err(AppError::Unprocessable("Unprocessable location".to_string()))
            }
        }
    }
}

/// Reads a coordinate from a JSON number or numeric string. Non-finite values are rejected.
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    parsed.is_finite().then_some(parsed)
}

/// Great-circle distance in kilometres between two points (haversine formula).
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1]; sqrt(1 - a) would then be NaN.
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
