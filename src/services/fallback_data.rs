//! Static per-region fallback data
//!
//! A `RegionalFallback` is an immutable table handed to the resolver at
//! construction. The built-in table covers Pakistan; other regions can be
//! loaded from a JSON file with the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{AmenityKind, DomainError, ServiceEntry, SourceType};
use crate::utils::geo::{BoundingBox, Coordinate, RadiusMeters};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalFallback {
    pub name: String,
    pub bounds: BoundingBox,
    #[serde(default)]
    pub hospitals: Vec<ServiceEntry>,
    #[serde(default)]
    pub emergency_services: Vec<ServiceEntry>,
}

impl RegionalFallback {
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.bounds.contains(point)
    }

    /// Hospitals no farther than `radius` from `origin`.
    pub fn hospitals_within(&self, origin: &Coordinate, radius: RadiusMeters) -> Vec<ServiceEntry> {
        self.hospitals
            .iter()
            .filter(|h| origin.distance_km(&h.coordinate()) <= radius.km())
            .cloned()
            .collect()
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            DomainError::Configuration(format!(
                "Invalid fallback dataset {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn pakistan() -> Self {
        let hospital = |name: &str, phone: &str, address: &str, lat: f64, lon: f64| {
            entry(name, AmenityKind::Hospital, phone, address, lat, lon)
        };

        Self {
            name: "Pakistan".to_string(),
            bounds: BoundingBox {
                min_lat: 23.5,
                max_lat: 37.5,
                min_lon: 60.5,
                max_lon: 77.5,
            },
            hospitals: vec![
                hospital(
                    "Pakistan Institute of Medical Sciences (PIMS)",
                    "+92-51-9260601",
                    "G-8/3, Islamabad",
                    33.6693,
                    73.0762,
                ),
                hospital(
                    "Shifa International Hospital",
                    "+92-51-8464646",
                    "Sector H-8/4, Islamabad",
                    33.6566,
                    73.0645,
                ),
                hospital(
                    "Armed Forces Institute of Cardiology",
                    "+92-51-9271858",
                    "Rawalpindi",
                    33.6007,
                    73.0679,
                ),
                hospital(
                    "Holy Family Hospital",
                    "+92-51-5560394",
                    "Rawalpindi",
                    33.5939,
                    73.0479,
                ),
                hospital(
                    "Combined Military Hospital (CMH)",
                    "+92-51-9270463",
                    "Rawalpindi",
                    33.5951,
                    73.0560,
                ),
                hospital(
                    "Benazir Bhutto Hospital",
                    "+92-51-9290301",
                    "Rawalpindi",
                    33.5978,
                    73.0444,
                ),
                hospital(
                    "Poly Clinic Hospital",
                    "+92-51-9218944",
                    "G-6/2, Islamabad",
                    33.6944,
                    73.0638,
                ),
                hospital(
                    "Capital Hospital CDA",
                    "+92-51-9252371",
                    "G-6/4, Islamabad",
                    33.6889,
                    73.0583,
                ),
            ],
            emergency_services: vec![
                entry(
                    "Pakistan Police Emergency",
                    AmenityKind::Police,
                    "15",
                    "Nationwide",
                    33.6362,
                    72.9837,
                ),
                entry(
                    "Rescue 1122",
                    AmenityKind::AmbulanceStation,
                    "1122",
                    "Emergency Medical Services",
                    33.6362,
                    72.9837,
                ),
                entry(
                    "Fire Brigade",
                    AmenityKind::FireStation,
                    "16",
                    "Fire Emergency",
                    33.6362,
                    72.9837,
                ),
                entry(
                    "Motorway Police",
                    AmenityKind::Police,
                    "130",
                    "Highway Emergency",
                    33.6362,
                    72.9837,
                ),
            ],
        }
    }
}

fn entry(
    name: &str,
    amenity: AmenityKind,
    phone: &str,
    address: &str,
    lat: f64,
    lon: f64,
) -> ServiceEntry {
    ServiceEntry {
        id: None,
        source_type: SourceType::Fallback,
        name: name.to_string(),
        amenity,
        phone: Some(phone.to_string()),
        address: Some(address.to_string()),
        lat,
        lon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pakistan_bounds() {
        let region = RegionalFallback::pakistan();
        assert!(region.contains(&Coordinate::new(33.6, 73.0).unwrap()));
        assert!(region.contains(&Coordinate::new(23.5, 60.5).unwrap()));
        assert!(!region.contains(&Coordinate::new(40.7, -74.0).unwrap()));
        assert!(!region.contains(&Coordinate::new(37.6, 73.0).unwrap()));
    }

    #[test]
    fn test_hospitals_within_radius() {
        let region = RegionalFallback::pakistan();
        let origin = Coordinate::new(33.6, 73.0).unwrap();

        assert_eq!(
            region
                .hospitals_within(&origin, RadiusMeters::default())
                .len(),
            8
        );

        // Lahore is ~270 km away from every listed hospital
        let lahore = Coordinate::new(31.5204, 74.3587).unwrap();
        assert!(
            region
                .hospitals_within(&lahore, RadiusMeters::clamped(50_000))
                .is_empty()
        );
    }

    #[test]
    fn test_dataset_round_trips_through_json() {
        let json = serde_json::to_string(&RegionalFallback::pakistan()).unwrap();
        let parsed: RegionalFallback = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.emergency_services.len(), 4);
        assert_eq!(parsed.emergency_services[1].phone.as_deref(), Some("1122"));
    }
}
