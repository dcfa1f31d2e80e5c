//! Domain error types
//!
//! These errors are framework-agnostic and represent resolution-level failures.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// Caller-supplied input rejected
    Validation(String),
    /// Upstream geodata service error (transport, status, payload, deadline)
    External(String),
    /// Invalid or unreadable configuration
    Configuration(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::External(msg) => write!(f, "External service error: {}", msg),
            DomainError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::External(e.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Configuration(e.to_string())
    }
}
