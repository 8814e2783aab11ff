//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! Router::navigate(path)
//!     → routing::RouteTable (resolve leaf + matched chain)
//!     → routing::query (ambient or inline query)
//!     → hooks.rs (before_each)
//!     → guards.rs (leave guards of current, then enter guards of candidate)
//!     → middleware.rs (onion around the authorized transition)
//!     → machine.rs commit (RouterState swap)
//!     → hooks.rs (after_each)
//!     → history.rs collaborator (push / replace)
//! ```
//!
//! # Design Decisions
//! - Guards authorize, middleware observes and enriches; guards always run first
//! - Callbacks are isolated: errors, panics and timeouts never escape `navigate`
//! - The host's history is an injected, optional capability

pub mod context;
pub mod error;
pub mod guards;
pub mod history;
pub mod hooks;
pub mod machine;
pub mod middleware;

pub use context::{RouteContext, RouterState, Transition};
pub use error::NavigationError;
pub use guards::{Guard, GuardRegistry};
pub use history::{MemoryHistory, NavigationHistory, NoopHistory};
pub use hooks::Hook;
pub use machine::{NavigateOptions, Router, RouterBuilder};
pub use middleware::{Middleware, Next};
