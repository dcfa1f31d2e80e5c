//! Fallback tiers backed by the OpenStreetMap clients

use std::time::Instant;

use async_trait::async_trait;

use crate::domain::{AmenityKind, DataSource, DomainError, ResolutionStrategy, ServiceLists};
use crate::modules::integrations::nominatim::NominatimClient;
use crate::modules::integrations::overpass::OverpassClient;
use crate::utils::geo::{Coordinate, RadiusMeters};

pub struct OverpassStrategy {
    client: OverpassClient,
}

impl OverpassStrategy {
    pub fn new(client: OverpassClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResolutionStrategy for OverpassStrategy {
    fn name(&self) -> &'static str {
        "overpass"
    }

    fn data_source(&self) -> DataSource {
        DataSource::OverpassOsm
    }

    async fn resolve(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
        deadline: Instant,
    ) -> Result<ServiceLists, DomainError> {
        Ok(self.client.search(origin, radius, deadline).await)
    }
}

/// Hospital, police and fire-station searches issued concurrently.
pub struct NominatimStrategy {
    client: NominatimClient,
}

impl NominatimStrategy {
    pub fn new(client: NominatimClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResolutionStrategy for NominatimStrategy {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    fn data_source(&self) -> DataSource {
        DataSource::NominatimOsm
    }

    async fn resolve(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
        deadline: Instant,
    ) -> Result<ServiceLists, DomainError> {
        let (hospitals, police, fire) = tokio::join!(
            self.client
                .search_amenity(origin, AmenityKind::Hospital, radius, deadline),
            self.client
                .search_amenity(origin, AmenityKind::Police, radius, deadline),
            self.client
                .search_amenity(origin, AmenityKind::FireStation, radius, deadline),
        );

        let mut emergency_services = police;
        emergency_services.extend(fire);

        Ok(ServiceLists {
            hospitals,
            emergency_services,
        })
    }
}
