//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router operations produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers/recorders is the binary's job
//! - Metric updates without an installed recorder are no-ops

pub mod logging;
pub mod metrics;
