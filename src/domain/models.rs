//! Request-scoped values produced while resolving nearby services.

use serde::{Deserialize, Serialize};

use crate::utils::geo::{Coordinate, RadiusMeters};

/// Point-of-interest category, as tagged by OpenStreetMap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmenityKind {
    Hospital,
    Clinic,
    Doctors,
    Pharmacy,
    Police,
    FireStation,
    AmbulanceStation,
}

impl AmenityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmenityKind::Hospital => "hospital",
            AmenityKind::Clinic => "clinic",
            AmenityKind::Doctors => "doctors",
            AmenityKind::Pharmacy => "pharmacy",
            AmenityKind::Police => "police",
            AmenityKind::FireStation => "fire_station",
            AmenityKind::AmbulanceStation => "ambulance_station",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hospital" => Some(AmenityKind::Hospital),
            "clinic" => Some(AmenityKind::Clinic),
            "doctors" => Some(AmenityKind::Doctors),
            "pharmacy" => Some(AmenityKind::Pharmacy),
            "police" => Some(AmenityKind::Police),
            "fire_station" => Some(AmenityKind::FireStation),
            "ambulance_station" => Some(AmenityKind::AmbulanceStation),
            _ => None,
        }
    }

    /// Medical facilities land in the `hospitals` list.
    pub fn is_medical(&self) -> bool {
        matches!(
            self,
            AmenityKind::Hospital
                | AmenityKind::Clinic
                | AmenityKind::Doctors
                | AmenityKind::Pharmacy
        )
    }
}

/// Where an entry came from. Serialized as the entry's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Node,
    Way,
    Relation,
    Nominatim,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type", default = "fallback_source")]
    pub source_type: SourceType,
    pub name: String,
    pub amenity: AmenityKind,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

fn fallback_source() -> SourceType {
    SourceType::Fallback
}

impl ServiceEntry {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// The two lists every fallback tier produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceLists {
    pub hospitals: Vec<ServiceEntry>,
    pub emergency_services: Vec<ServiceEntry>,
}

impl ServiceLists {
    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty() && self.emergency_services.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    OverpassOsm,
    NominatimOsm,
    FallbackOnly,
    EmergencyFallback,
}

/// Outcome of one `/nearby` resolution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyServices {
    pub hospitals: Vec<ServiceEntry>,
    pub emergency_services: Vec<ServiceEntry>,
    pub radius: RadiusMeters,
    pub data_source: DataSource,
    pub location: Coordinate,
}
