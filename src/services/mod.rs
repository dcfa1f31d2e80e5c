//! Services Layer
//!
//! Resolution logic kept apart from the HTTP layer so it can be driven
//! directly by handlers or by tests.

pub mod dedup;
pub mod fallback_data;
pub mod nearby_service;
pub mod strategies;

// Re-export for convenience
pub use dedup::DedupStrategy;
pub use fallback_data::RegionalFallback;
pub use nearby_service::NearbyResolver;
pub use strategies::{NominatimStrategy, OverpassStrategy};
