//! Configuration schema definitions.
//!
//! A route file declares the navigation settings and the route tree. Guards are code,
//! so routes refer to them by name and the names are resolved against a
//! [`GuardRegistry`](crate::navigation::GuardRegistry) when the routes are built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::routing::route::RouteMeta;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Navigation engine settings.
    pub navigation: NavigationConfig,

    /// Top-level routes, in registration order.
    pub routes: Vec<RouteConfig>,
}

/// Navigation engine settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Deadline for each guard, middleware chain and hook, in milliseconds.
    /// Unset means callbacks may take as long as they like.
    pub callback_timeout_ms: Option<u64>,

    /// Default log filter for binaries (trace, debug, info, warn, error).
    pub log_level: String,
}

impl NavigationConfig {
    pub fn callback_timeout(&self) -> Option<Duration> {
        self.callback_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            callback_timeout_ms: None,
            log_level: "info".to_string(),
        }
    }
}

/// A declared route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Path pattern, relative to the parent for nested routes.
    pub path: String,

    /// Component identifier.
    pub component: String,

    /// Optional name for lookups.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub meta: RouteMeta,

    /// Names of guards that must pass to enter this route.
    #[serde(default)]
    pub before_enter: Vec<String>,

    /// Names of guards that must pass to leave this route.
    #[serde(default)]
    pub before_leave: Vec<String>,

    #[serde(default)]
    pub children: Vec<RouteConfig>,
}
