//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber
//! - Configure log level from environment or config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - JSON format for machine consumption, pretty format otherwise

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("route_dispatch={}", config.log_level.to_ascii_lowercase())
}

/// Install the global subscriber.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_filter(&config), "route_dispatch=info");

        config.log_level = "DEBUG".into();
        assert_eq!(default_filter(&config), "route_dispatch=debug");
    }
}
