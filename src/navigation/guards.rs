//! Enter/leave guard execution.
//!
//! # Responsibilities
//! - Run a route's guard list strictly in registration order
//! - Stop at the first guard that does not allow the transition
//! - Treat guard errors, panics and timeouts exactly like a `false` verdict
//!
//! # Design Decisions
//! - Guards are awaited one at a time; no fan-out
//! - The orchestrator runs every leave guard before any enter guard

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::navigation::context::Transition;
use crate::observability::metrics;
use crate::resilience::isolation::{isolate, BoxError};
use crate::routing::route::Route;

/// A predicate gating entry to or exit from a route.
///
/// Implemented for any `Fn(Transition) -> impl Future<Output = Result<bool, BoxError>>`.
pub trait Guard: Send + Sync + 'static {
    fn check(&self, transition: Transition) -> BoxFuture<'static, Result<bool, BoxError>>;
}

impl<F, Fut> Guard for F
where
    F: Fn(Transition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, BoxError>> + Send + 'static,
{
    fn check(&self, transition: Transition) -> BoxFuture<'static, Result<bool, BoxError>> {
        self(transition).boxed()
    }
}

pub type SharedGuard = Arc<dyn Guard>;

/// Guards registered under a name so declarative route configs can refer to them.
#[derive(Clone, Default)]
pub struct GuardRegistry {
    guards: HashMap<String, SharedGuard>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<G: Guard>(&mut self, name: impl Into<String>, guard: G) -> &mut Self {
        self.guards.insert(name.into(), Arc::new(guard));
        self
    }

    pub fn get(&self, name: &str) -> Option<SharedGuard> {
        self.guards.get(name).cloned()
    }
}

impl fmt::Debug for GuardRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardRegistry")
            .field("names", &self.guards.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDirection {
    Enter,
    Leave,
}

impl GuardDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            GuardDirection::Enter => "enter",
            GuardDirection::Leave => "leave",
        }
    }
}

impl fmt::Display for GuardDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of a rejected guard chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub direction: GuardDirection,
    /// Pattern of the route whose guard rejected.
    pub route: String,
    /// Position of the rejecting guard in the route's list.
    pub index: usize,
    /// `None` for a plain `false`; otherwise the failure that stood in for one.
    pub failure: Option<String>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} guard #{} on `{}` rejected",
            self.direction, self.index, self.route
        )?;
        if let Some(failure) = &self.failure {
            write!(f, " ({})", failure)?;
        }
        Ok(())
    }
}

/// Runs guard chains with short-circuit rejection.
#[derive(Debug, Clone, Default)]
pub struct GuardExecutor {
    timeout: Option<Duration>,
}

impl GuardExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub async fn run_enter(&self, route: &Route, transition: &Transition) -> Result<(), Rejection> {
        self.run(GuardDirection::Enter, route, route.enter_guards(), transition)
            .await
    }

    pub async fn run_leave(&self, route: &Route, transition: &Transition) -> Result<(), Rejection> {
        self.run(GuardDirection::Leave, route, route.leave_guards(), transition)
            .await
    }

    async fn run(
        &self,
        direction: GuardDirection,
        route: &Route,
        guards: &[SharedGuard],
        transition: &Transition,
    ) -> Result<(), Rejection> {
        for (index, guard) in guards.iter().enumerate() {
            let guard = Arc::clone(guard);
            let transition = transition.clone();
            let verdict = isolate(async move { guard.check(transition).await }, self.timeout).await;

            let failure = match verdict {
                Ok(true) => continue,
                Ok(false) => None,
                Err(failure) => {
                    metrics::record_callback_fault("guard");
                    tracing::warn!(
                        direction = direction.as_str(),
                        route = route.path(),
                        index,
                        error = %failure,
                        "Guard failed, treating as rejection"
                    );
                    Some(failure.to_string())
                }
            };

            return Err(Rejection {
                direction,
                route: route.path().to_string(),
                index,
                failure,
            });
        }
        Ok(())
    }
}
