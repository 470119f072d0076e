//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All components produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → stderr (fmt subscriber)
//!     → whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields, never formatted-in values, for addresses and amounts
//! - Each transaction attempt carries an `attempt_id` for correlation
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
