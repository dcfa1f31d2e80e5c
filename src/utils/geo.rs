//! Coordinates, radii and great-circle distance.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_RADIUS_METERS: u32 = 500;
pub const MAX_RADIUS_METERS: u32 = 50_000;
pub const DEFAULT_RADIUS_METERS: u32 = 25_000;

/// A validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Returns `None` unless both values are finite and inside the
    /// latitude/longitude ranges.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if is_valid_coords(lat, lon) {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    /// Parse raw query-string values. Missing or non-numeric input is invalid.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        let lat = lat?.trim().parse::<f64>().ok()?;
        let lon = lon?.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

pub fn is_valid_coords(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Great-circle distance in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Search radius in meters, always inside `[500, 50000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RadiusMeters(u32);

impl RadiusMeters {
    pub fn clamped(meters: i64) -> Self {
        let clamped = meters.clamp(MIN_RADIUS_METERS as i64, MAX_RADIUS_METERS as i64);
        Self(clamped as u32)
    }

    /// Parse the optional `radius` query value.
    ///
    /// Only plain integer or decimal forms count as numeric; missing values,
    /// exponents and anything else behave as if omitted. Fractional values
    /// are truncated toward zero before clamping.
    pub fn from_query(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| is_decimal(s)) else {
            return Self::default();
        };

        if let Ok(meters) = raw.parse::<i64>() {
            return Self::clamped(meters);
        }

        match raw.parse::<f64>() {
            Ok(meters) if meters.is_finite() => Self::clamped(meters.trunc() as i64),
            _ => Self::default(),
        }
    }

    pub fn meters(&self) -> u32 {
        self.0
    }

    pub fn km(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// `[+-]digits[.digits]`, with at least one digit overall.
fn is_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

impl Default for RadiusMeters {
    fn default() -> Self {
        Self(DEFAULT_RADIUS_METERS)
    }
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    /// Box extending `degrees` in every direction around `center`.
    pub fn around(center: &Coordinate, degrees: f64) -> Self {
        Self {
            min_lat: center.lat - degrees,
            max_lat: center.lat + degrees,
            min_lon: center.lon - degrees,
            max_lon: center.lon + degrees,
        }
    }

    /// Nominatim `viewbox` order: left,top,right,bottom.
    pub fn to_viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }
}
