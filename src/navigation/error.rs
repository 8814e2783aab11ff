//! Reasons a navigation does not commit.
//!
//! These never cross the public `navigate` boundary, which only reports success or
//! failure. They exist so every failure is logged and counted uniformly.

use thiserror::Error;

use crate::navigation::guards::Rejection;
use crate::resilience::isolation::CallbackFailure;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no route matches `{0}`")]
    NoMatch(String),

    #[error("{0}")]
    GuardRejected(Rejection),

    #[error("another navigation is already in flight")]
    ConcurrentNavigation,

    #[error("{stage} failed: {failure}")]
    CallbackFault {
        stage: &'static str,
        failure: CallbackFailure,
    },
}

impl NavigationError {
    /// Metric label for the outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            NavigationError::NoMatch(_) => "no_match",
            NavigationError::GuardRejected(_) => "guard_rejected",
            NavigationError::ConcurrentNavigation => "concurrent",
            NavigationError::CallbackFault { .. } => "callback_fault",
        }
    }
}
