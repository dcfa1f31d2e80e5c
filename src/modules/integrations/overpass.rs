//! Overpass API integration
//!
//! Finds medical facilities, police and fire stations around a point with a
//! single Overpass QL query.

use std::collections::HashMap;
use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::with_deadline;
use crate::domain::{AmenityKind, DomainError, ServiceEntry, ServiceLists, SourceType};
use crate::utils::geo::{Coordinate, RadiusMeters};

/// Server-side timeout requested in the query header, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;

const UNNAMED: &str = "Unnamed";

/// (tag, value regex, element types)
const FILTERS: &[(&str, &str, &[&str])] = &[
    (
        "amenity",
        "^(hospital|clinic|doctors|pharmacy)$",
        &["node", "way", "relation"],
    ),
    ("amenity", "^(police|fire_station)$", &["node", "way", "relation"]),
    ("healthcare", "^(hospital|clinic)$", &["node", "way"]),
];

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    id: u64,
    #[serde(rename = "type", default)]
    kind: String,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Search around `origin`. Failures are logged and yield empty lists.
    pub async fn search(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
        deadline: Instant,
    ) -> ServiceLists {
        match with_deadline(deadline, self.try_search(origin, radius)).await {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!("Overpass lookup failed: {}", e);
                ServiceLists::default()
            }
        }
    }

    async fn try_search(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
    ) -> Result<ServiceLists, DomainError> {
        let query = build_query(origin, radius);

        let res = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(DomainError::External(format!(
                "Overpass API error: {}",
                res.status()
            )));
        }

        let data: OverpassResponse = res.json().await?;
        Ok(classify_elements(data.elements))
    }
}

/// Overpass QL query unioning every amenity filter around `origin`.
pub fn build_query(origin: Coordinate, radius: RadiusMeters) -> String {
    let around = format!("(around:{},{},{})", radius.meters(), origin.lat, origin.lon);

    let mut query = format!("[out:json][timeout:{}];\n(\n", QUERY_TIMEOUT_SECS);
    for (key, pattern, element_types) in FILTERS {
        for element_type in *element_types {
            query.push_str(&format!(
                "  {}[\"{}\"~\"{}\"]{};\n",
                element_type, key, pattern, around
            ));
        }
    }
    query.push_str(");\nout center geom;");
    query
}

fn classify_elements(elements: Vec<OverpassElement>) -> ServiceLists {
    let mut lists = ServiceLists::default();

    for element in elements {
        let Some(entry) = to_entry(element) else {
            continue;
        };

        if entry.amenity.is_medical() {
            lists.hospitals.push(entry);
        } else if matches!(entry.amenity, AmenityKind::Police | AmenityKind::FireStation) {
            lists.emergency_services.push(entry);
        }
    }

    lists
}

fn to_entry(element: OverpassElement) -> Option<ServiceEntry> {
    let center = element.center.as_ref();
    let lat = element.lat.or_else(|| center.and_then(|c| c.lat))?;
    let lon = element.lon.or_else(|| center.and_then(|c| c.lon))?;

    let tags = &element.tags;
    let amenity = tag(tags, "amenity")
        .or_else(|| tag(tags, "healthcare"))
        .and_then(AmenityKind::from_tag)?;

    let source_type = match element.kind.as_str() {
        "way" => SourceType::Way,
        "relation" => SourceType::Relation,
        _ => SourceType::Node,
    };

    let name = tag(tags, "name:en")
        .or_else(|| tag(tags, "name"))
        .unwrap_or(UNNAMED)
        .to_string();

    let phone = tag(tags, "phone")
        .or_else(|| tag(tags, "contact:phone"))
        .or_else(|| tag(tags, "emergency:phone"))
        .map(str::to_string);

    let address_parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:city"]
        .iter()
        .filter_map(|key| tag(tags, key))
        .collect();
    let address = if address_parts.is_empty() {
        None
    } else {
        Some(address_parts.join(", "))
    };

    Some(ServiceEntry {
        id: Some(element.id),
        source_type,
        name,
        amenity,
        phone,
        address,
        lat,
        lon,
    })
}

/// Non-empty tag value.
fn tag<'a>(tags: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
