//! Navigation metrics.
//!
//! # Metrics
//! - `waypoint_navigations_total` (counter): navigations by outcome
//! - `waypoint_navigation_duration_seconds` (histogram): time spent in `navigate`
//! - `waypoint_callback_faults_total` (counter): failed callbacks by stage
//!
//! # Design Decisions
//! - Emitted through the `metrics` facade; no recorder is installed by the library,
//!   so these are no-ops until the host installs one

use std::time::Duration;

pub fn record_navigation(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("waypoint_navigations_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("waypoint_navigation_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_callback_fault(stage: &'static str) {
    ::metrics::counter!("waypoint_callback_faults_total", "stage" => stage).increment(1);
}
