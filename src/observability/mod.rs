//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Decoding pipeline and client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log output (stdout, pretty or JSON)
//!     → Whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
