use std::env;
use std::time::Duration;

use crate::services::dedup::DedupStrategy;
use crate::services::fallback_data::RegionalFallback;
use crate::services::nearby_service::MAX_DEADLINE;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_PROXIMITY_METERS: f64 = 100.0;

/// Built-in fallback tables selectable with `FALLBACK_REGION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackRegion {
    Pakistan,
    None,
}

impl FallbackRegion {
    pub fn dataset(&self) -> Option<RegionalFallback> {
        match self {
            FallbackRegion::Pakistan => Some(RegionalFallback::pakistan()),
            FallbackRegion::None => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub user_agent: String,
    pub upstream_deadline: Duration,
    pub dedup_strategy: DedupStrategy,
    pub fallback_region: FallbackRegion,
    pub fallback_dataset_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: Vec::new(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: default_user_agent(),
            upstream_deadline: Duration::from_secs(30),
            dedup_strategy: DedupStrategy::Exact,
            fallback_region: FallbackRegion::Pakistan,
            fallback_dataset_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let dedup_strategy = match env::var("DEDUP_STRATEGY")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            Ok("proximity") => DedupStrategy::Proximity {
                threshold_meters: proximity_threshold(),
            },
            Ok("exact") | Err(_) => DedupStrategy::Exact,
            Ok(other) => {
                tracing::warn!("Unknown DEDUP_STRATEGY '{}', using exact", other);
                DedupStrategy::Exact
            }
        };

        let fallback_region = match env::var("FALLBACK_REGION")
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            Ok("none") | Ok("off") => FallbackRegion::None,
            Ok("pakistan") | Err(_) => FallbackRegion::Pakistan,
            Ok(other) => {
                tracing::warn!("Unknown FALLBACK_REGION '{}', using pakistan", other);
                FallbackRegion::Pakistan
            }
        };

        Self {
            port: parse_var("PORT", defaults.port),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(Vec::new),
            overpass_url: env::var("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            nominatim_url: env::var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            user_agent: env::var("UPSTREAM_USER_AGENT").unwrap_or(defaults.user_agent),
            upstream_deadline: upstream_deadline(),
            dedup_strategy,
            fallback_region,
            fallback_dataset_path: env::var("FALLBACK_DATASET_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "RescueLocator/{} (emergency services lookup)",
        env!("CARGO_PKG_VERSION")
    )
}

fn proximity_threshold() -> f64 {
    let meters = parse_var("DEDUP_PROXIMITY_METERS", DEFAULT_PROXIMITY_METERS);
    if meters.is_finite() && meters > 0.0 {
        meters
    } else {
        tracing::warn!(
            "DEDUP_PROXIMITY_METERS must be a positive distance, using default {}",
            DEFAULT_PROXIMITY_METERS
        );
        DEFAULT_PROXIMITY_METERS
    }
}

fn upstream_deadline() -> Duration {
    let deadline = Duration::from_secs(parse_var("UPSTREAM_DEADLINE_SECS", 30));
    if deadline > MAX_DEADLINE {
        tracing::warn!(
            "UPSTREAM_DEADLINE_SECS capped at {}",
            MAX_DEADLINE.as_secs()
        );
        return MAX_DEADLINE;
    }
    deadline
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {} value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "PORT",
        "CORS_ALLOWED_ORIGINS",
        "OVERPASS_URL",
        "NOMINATIM_URL",
        "UPSTREAM_DEADLINE_SECS",
        "DEDUP_STRATEGY",
        "DEDUP_PROXIMITY_METERS",
        "FALLBACK_REGION",
        "FALLBACK_DATASET_PATH",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        clear_env();
        let config = Config::from_env();

        assert_eq!(config.port, 5000);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.overpass_url, DEFAULT_OVERPASS_URL);
        assert_eq!(config.upstream_deadline, Duration::from_secs(30));
        assert_eq!(config.dedup_strategy, DedupStrategy::Exact);
        assert_eq!(config.fallback_region, FallbackRegion::Pakistan);
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        unsafe {
            env::set_var("PORT", "8080");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://resq.example");
            env::set_var("DEDUP_STRATEGY", "Proximity");
            env::set_var("DEDUP_PROXIMITY_METERS", "250");
            env::set_var("FALLBACK_REGION", "none");
            env::set_var("UPSTREAM_DEADLINE_SECS", "not-a-number");
        }

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "https://resq.example"]
        );
        assert_eq!(
            config.dedup_strategy,
            DedupStrategy::Proximity {
                threshold_meters: 250.0
            }
        );
        assert_eq!(config.fallback_region, FallbackRegion::None);
        assert_eq!(config.upstream_deadline, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_rejects_unusable_proximity_threshold() {
        for raw in ["NaN", "inf", "-50", "0"] {
            clear_env();
            unsafe {
                env::set_var("DEDUP_STRATEGY", "proximity");
                env::set_var("DEDUP_PROXIMITY_METERS", raw);
            }

            let config = Config::from_env();
            assert_eq!(
                config.dedup_strategy,
                DedupStrategy::Proximity {
                    threshold_meters: 100.0
                },
                "{}",
                raw
            );
        }
        clear_env();
    }

    #[test]
    #[serial]
    fn test_caps_oversized_deadline() {
        clear_env();
        unsafe { env::set_var("UPSTREAM_DEADLINE_SECS", "18446744073709551615") };

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.upstream_deadline, MAX_DEADLINE);
    }
}
