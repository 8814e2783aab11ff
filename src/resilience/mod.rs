//! Resilience for user-supplied navigation callbacks.
//!
//! # Design Decisions
//! - Callback failures (errors, panics, timeouts) are values, never unwinds
//! - Timeouts are opt-in; by default callbacks are awaited to completion

pub mod isolation;
pub mod timeouts;

pub use isolation::{isolate, BoxError, CallbackFailure};
