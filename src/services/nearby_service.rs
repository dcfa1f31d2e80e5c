//! Nearby Service - Resolves hospitals and emergency services around a point
//!
//! Tiers are tried in order and the first non-empty one wins. The regional
//! fallback table is merged in afterwards, then duplicates are removed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{DataSource, DomainError, NearbyServices, ResolutionStrategy, ServiceEntry};
use crate::infrastructure::config::Config;
use crate::modules::integrations::nominatim::NominatimClient;
use crate::modules::integrations::overpass::OverpassClient;
use crate::services::dedup::DedupStrategy;
use crate::services::fallback_data::RegionalFallback;
use crate::services::strategies::{NominatimStrategy, OverpassStrategy};
use crate::utils::geo::{Coordinate, RadiusMeters};

/// Upper bound on the per-request upstream budget.
pub const MAX_DEADLINE: Duration = Duration::from_secs(300);

pub struct NearbyResolver {
    strategies: Vec<Arc<dyn ResolutionStrategy>>,
    region: Option<RegionalFallback>,
    dedup: DedupStrategy,
    deadline: Duration,
}

impl NearbyResolver {
    pub fn new(
        strategies: Vec<Arc<dyn ResolutionStrategy>>,
        region: Option<RegionalFallback>,
        dedup: DedupStrategy,
        deadline: Duration,
    ) -> Self {
        Self {
            strategies,
            region,
            dedup,
            deadline: deadline.min(MAX_DEADLINE),
        }
    }

    /// Overpass then Nominatim, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        for (label, raw) in [
            ("OVERPASS_URL", &config.overpass_url),
            ("NOMINATIM_URL", &config.nominatim_url),
        ] {
            url::Url::parse(raw).map_err(|e| {
                DomainError::Configuration(format!("{} is not a valid URL ({}): {}", label, raw, e))
            })?;
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let strategies: Vec<Arc<dyn ResolutionStrategy>> = vec![
            Arc::new(OverpassStrategy::new(OverpassClient::new(
                http.clone(),
                config.overpass_url.clone(),
            ))),
            Arc::new(NominatimStrategy::new(NominatimClient::new(
                http,
                config.nominatim_url.clone(),
            ))),
        ];

        let region = match &config.fallback_dataset_path {
            Some(path) => Some(RegionalFallback::load_json(path)?),
            None => config.fallback_region.dataset(),
        };

        Ok(Self::new(
            strategies,
            region,
            config.dedup_strategy,
            config.upstream_deadline,
        ))
    }

    pub async fn resolve(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
    ) -> Result<NearbyServices, DomainError> {
        let now = Instant::now();
        let deadline = now.checked_add(self.deadline).unwrap_or(now + MAX_DEADLINE);
        let mut found = None;

        for strategy in &self.strategies {
            let lists = strategy.resolve(origin, radius, deadline).await?;
            if lists.is_empty() {
                tracing::debug!("{} returned no services", strategy.name());
                continue;
            }

            tracing::info!(
                "Found {} hospitals, {} emergency services via {}",
                lists.hospitals.len(),
                lists.emergency_services.len(),
                strategy.name()
            );
            found = Some((lists, strategy.data_source()));
            break;
        }

        let (mut lists, data_source) = match found {
            Some((lists, source)) => (lists, source),
            None => (Default::default(), DataSource::FallbackOnly),
        };

        if let Some(region) = self.region_for(&origin) {
            lists
                .hospitals
                .extend(region.hospitals_within(&origin, radius));
            lists
                .emergency_services
                .extend(region.emergency_services.iter().cloned());
        }

        let lists = self.dedup.apply(lists);

        Ok(NearbyServices {
            hospitals: lists.hospitals,
            emergency_services: lists.emergency_services,
            radius,
            data_source,
            location: origin,
        })
    }

    /// Configured region, if `point` falls inside it.
    pub fn region_for(&self, point: &Coordinate) -> Option<&RegionalFallback> {
        self.region.as_ref().filter(|r| r.contains(point))
    }

    /// Static emergency numbers covering `point`; empty outside the region.
    pub fn emergency_numbers(&self, point: &Coordinate) -> Vec<ServiceEntry> {
        self.region_for(point)
            .map(|r| r.emergency_services.clone())
            .unwrap_or_default()
    }
}
