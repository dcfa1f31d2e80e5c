//! Clients for the public OpenStreetMap services.

pub mod nominatim;
pub mod overpass;

use std::future::Future;
use std::time::Instant;

use crate::domain::DomainError;

/// Run an upstream call, failing with `External` once `deadline` passes.
pub(crate) async fn with_deadline<T, F>(deadline: Instant, call: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::External("deadline exceeded".to_string())),
    }
}
