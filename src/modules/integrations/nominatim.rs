//! Nominatim search integration
//!
//! Amenity search scoped to a viewbox around the requested point, with results
//! post-filtered by true great-circle distance.

use std::time::Instant;

use serde::Deserialize;

use super::with_deadline;
use crate::domain::{AmenityKind, DomainError, ServiceEntry, SourceType};
use crate::utils::geo::{BoundingBox, Coordinate, RadiusMeters};

/// Half-width of the search viewbox, in degrees.
const VIEWBOX_DEGREES: f64 = 0.5;
const MAX_FILTER_RADIUS_KM: f64 = 50.0;
const RESULT_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub place_id: Option<u64>,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Places tagged `amenity` within `radius` of `origin`.
    /// Failures are logged and yield an empty list.
    pub async fn search_amenity(
        &self,
        origin: Coordinate,
        amenity: AmenityKind,
        radius: RadiusMeters,
        deadline: Instant,
    ) -> Vec<ServiceEntry> {
        match with_deadline(deadline, self.try_search(origin, amenity)).await {
            Ok(places) => filter_places(places, origin, amenity, radius),
            Err(e) => {
                tracing::warn!("Nominatim {} lookup failed: {}", amenity.as_str(), e);
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        origin: Coordinate,
        amenity: AmenityKind,
    ) -> Result<Vec<NominatimPlace>, DomainError> {
        let url = format!("{}/search", self.base_url);
        let lat = origin.lat.to_string();
        let lon = origin.lon.to_string();
        let viewbox = BoundingBox::around(&origin, VIEWBOX_DEGREES).to_viewbox();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("format", "json"),
                ("amenity", amenity.as_str()),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("bounded", "1"),
                ("viewbox", viewbox.as_str()),
                ("limit", RESULT_LIMIT),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(DomainError::External(format!(
                "Nominatim API error: {}",
                res.status()
            )));
        }

        Ok(res.json().await?)
    }
}

/// Drop places outside the (capped) radius and normalize the survivors.
pub fn filter_places(
    places: Vec<NominatimPlace>,
    origin: Coordinate,
    amenity: AmenityKind,
    radius: RadiusMeters,
) -> Vec<ServiceEntry> {
    let max_km = radius.km().min(MAX_FILTER_RADIUS_KM);

    places
        .into_iter()
        .filter_map(|place| {
            let lat = place.lat.trim().parse::<f64>().ok()?;
            let lon = place.lon.trim().parse::<f64>().ok()?;
            let position = Coordinate::new(lat, lon)?;

            if origin.distance_km(&position) > max_km {
                return None;
            }

            let name = place
                .display_name
                .split(',')
                .next()
                .unwrap_or_default()
                .to_string();

            Some(ServiceEntry {
                id: place.place_id,
                source_type: SourceType::Nominatim,
                name,
                amenity,
                phone: None,
                address: Some(place.display_name),
                lat,
                lon,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: u64, lat: &str, lon: &str, display_name: &str) -> NominatimPlace {
        NominatimPlace {
            place_id: Some(id),
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[test]
    fn test_filters_by_distance() {
        let origin = Coordinate::new(33.6, 73.0).unwrap();
        let places = vec![
            place(1, "33.61", "73.01", "Near Hospital, Street 1, Islamabad"),
            place(2, "34.05", "73.45", "Far Hospital, Murree"),
            place(3, "not-a-number", "73.0", "Broken"),
        ];

        let entries = filter_places(
            places,
            origin,
            AmenityKind::Hospital,
            RadiusMeters::clamped(10_000),
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, Some(1));
    }

    #[test]
    fn test_normalizes_entry() {
        let origin = Coordinate::new(33.6, 73.0).unwrap();
        let entries = filter_places(
            vec![place(42, "33.6", "73.0", "Margalla Police, F-6, Islamabad")],
            origin,
            AmenityKind::Police,
            RadiusMeters::default(),
        );

        let entry = &entries[0];
        assert_eq!(entry.name, "Margalla Police");
        assert_eq!(entry.phone, None);
        assert_eq!(
            entry.address.as_deref(),
            Some("Margalla Police, F-6, Islamabad")
        );
        assert_eq!(entry.source_type, SourceType::Nominatim);
        assert_eq!(entry.amenity, AmenityKind::Police);
    }
}
