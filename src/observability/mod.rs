//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Relay and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (opt-in)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) is attached to every relay log event
//! - `RUST_LOG` overrides the configured level
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
