//! Application state shared across all handlers

use std::sync::Arc;

use crate::services::NearbyResolver;

#[derive(Clone)]
pub struct AppState {
    /// Nearby-services resolver with its fallback tiers and regional table
    pub resolver: Arc<NearbyResolver>,
}

impl AppState {
    pub fn new(resolver: NearbyResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }
}
