//! Domain layer - Pure resolution abstractions
//!
//! This layer contains NO framework dependencies (no Axum, no HTTP client calls).
//! Only the request-scoped models, the strategy trait and domain error types.

pub mod errors;
pub mod models;
pub mod strategies;

pub use errors::DomainError;
pub use models::*;
pub use strategies::ResolutionStrategy;
