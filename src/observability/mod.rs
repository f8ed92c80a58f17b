//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP server and lifecycle produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The routing core never logs; only the transport does
//! - Request ID is attached to every log line of a request
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
