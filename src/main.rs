use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rescue_locator::infrastructure::AppState;
use rescue_locator::services::NearbyResolver;
use rescue_locator::{config, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rescue_locator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    let resolver = match NearbyResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!("Failed to build resolver: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Upstreams: overpass={} nominatim={} (deadline {:?}, dedup {:?})",
        config.overpass_url,
        config.nominatim_url,
        config.upstream_deadline,
        config.dedup_strategy
    );

    if let Err(e) = server::serve(&config, AppState::new(resolver)).await {
        tracing::error!("HTTP server error: {}", e);
        std::process::exit(1);
    }
}
