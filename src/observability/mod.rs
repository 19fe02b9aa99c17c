//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine, API and stores produce:
//!     → logging.rs (structured log events, cycle/service spans)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every cycle carries its id in a span, so per-service lines correlate
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
