//! Resolution strategy contract
//!
//! A strategy is one fallback tier: given a position and radius it produces
//! hospital and emergency-service lists. Implementations live in the
//! services layer.

use std::time::Instant;

use async_trait::async_trait;

use super::{DataSource, DomainError, ServiceLists};
use crate::utils::geo::{Coordinate, RadiusMeters};

#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Label reported to clients when this tier supplies the results
    fn data_source(&self) -> DataSource;

    /// Resolve services around `origin`.
    ///
    /// Upstream unavailability is expected to come back as empty lists. An
    /// `Err` aborts the whole resolution.
    async fn resolve(
        &self,
        origin: Coordinate,
        radius: RadiusMeters,
        deadline: Instant,
    ) -> Result<ServiceLists, DomainError>;
}
