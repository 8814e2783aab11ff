//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declarations (builder, config file, or discovery.rs)
//!     → table.rs (join nested patterns, compile via matcher.rs)
//!     → Freeze as immutable RouteTable
//!
//! Lookup:
//!     pathname
//!     → table.rs (depth-first scan in registration order)
//!     → matcher.rs (anchored segment match + param extraction)
//!     → Return: leaf + matched chain, or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at construction, immutable afterwards
//! - No regex in the hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order, depth first)

pub mod discovery;
pub mod matcher;
pub mod query;
pub mod route;
pub mod table;

pub use matcher::{PathMatcher, PatternError};
pub use route::{Route, RouteMeta};
pub use table::{ResolvedRoute, RouteTable};
