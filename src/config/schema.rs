//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Dispatcher settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings for the bundled demo binary.
    pub demo: DemoConfig,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum number of handlers executing at once.
    /// Values below 1 mean no limit.
    pub max_parallel_executions: i64,
}

impl DispatchConfig {
    /// The concurrency cap, or `None` when unlimited.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.max_parallel_executions)
            .ok()
            .filter(|limit| *limit > 0)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_parallel_executions: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Demo workload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of concurrent route runs to issue.
    pub runs: usize,

    /// Lower bound of simulated handler work in milliseconds.
    pub min_work_ms: u64,

    /// Upper bound of simulated handler work in milliseconds.
    pub max_work_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            runs: 200,
            min_work_ms: 30,
            max_work_ms: 80,
        }
    }
}
