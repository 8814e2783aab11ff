//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! navigation subsystem produces:
//!     → logging.rs (structured events, one `navigate` span per call with a nav_id)
//!     → metrics.rs (outcome counters, duration histogram, callback faults)
//! ```
//!
//! # Design Decisions
//! - Every navigation carries a UUID so its guard/hook/middleware events correlate
//! - Metrics are cheap facade calls

pub mod logging;
pub mod metrics;
