pub mod api;
pub mod api_docs;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod services;
pub mod utils;

pub use infrastructure::config;
pub use infrastructure::server;
pub use modules::integrations::{nominatim, overpass};
