//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all patterns compiled once)
//!     → RouterConfig (validated, immutable)
//!     → loader::build_routes (guard names resolved via GuardRegistry)
//!     → Vec<Route> handed to RouterBuilder
//! ```
//!
//! # Design Decisions
//! - Routes are fixed once the router is built; there is no hot reload
//! - All settings have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_routes, load_config, parse_config, ConfigError};
pub use schema::{NavigationConfig, RouteConfig, RouterConfig};
