//! Waypoint: the navigation engine of a client-side application framework.
//!
//! A route tree with first-match-wins resolution, and a guarded,
//! middleware-composed `navigate` transaction over a single shared state.
//!
//! ```no_run
//! use waypoint::{Route, Router, NavigateOptions};
//!
//! # async fn demo() -> Result<(), waypoint::PatternError> {
//! let router = Router::new(vec![
//!     Route::new("/", "Home"),
//!     Route::new("/user/:id", "User"),
//! ])?;
//!
//! assert!(router.navigate("/user/123", NavigateOptions::default()).await);
//! let current = router.current_route();
//! assert_eq!(current.and_then(|c| c.param("id").map(str::to_string)).as_deref(), Some("123"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod navigation;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::RouterConfig;
pub use navigation::{
    Guard, GuardRegistry, Hook, MemoryHistory, Middleware, NavigateOptions, NavigationHistory, Next,
    NoopHistory, RouteContext, Router, RouterBuilder, RouterState, Transition,
};
pub use resilience::BoxError;
pub use routing::{PatternError, Route, RouteMeta};
