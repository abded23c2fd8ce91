//! # Utility Modules
//!
//! Logging setup and per-session counters.
//!
//! ## Components
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe per-session counters and an operation timer

pub mod logging;
pub mod metrics;

pub use metrics::{Failure, Metrics, MetricsSnapshot, Timer};
