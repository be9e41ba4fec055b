//! # Tripwise Telemetry
//!
//! Structured logging for the Tripwise pipeline built on `tracing`.
//!
//! ```rust
//! use tripwise_telemetry::{info, init_telemetry};
//!
//! init_telemetry("tripwise").expect("telemetry");
//! info!(stage = "research", "stage started");
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use init::{init_json_telemetry, init_telemetry};
pub use spans::*;
