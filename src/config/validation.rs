//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every full pattern so bad patterns fail at load time
//! - Detect duplicate route names and empty components
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: `&RouterConfig → Result<(), Vec<ValidationError>>`

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::routing::matcher::{join_patterns, PathMatcher, PatternError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route `{path}` has an empty component")]
    EmptyComponent { path: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("route name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("navigation.callback_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    if config.navigation.callback_timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    validate_routes(&config.routes, "/", &mut names, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes<'a>(
    routes: &'a [RouteConfig],
    parent_pattern: &str,
    names: &mut HashSet<&'a str>,
    errors: &mut Vec<ValidationError>,
) {
    for route in routes {
        let full = join_patterns(parent_pattern, &route.path);

        if route.component.trim().is_empty() {
            errors.push(ValidationError::EmptyComponent { path: full.clone() });
        }

        if let Err(err) = PathMatcher::compile(&full) {
            errors.push(err.into());
        }

        if let Some(name) = route.name.as_deref() {
            if !names.insert(name) {
                errors.push(ValidationError::DuplicateName(name.to_string()));
            }
        }

        validate_routes(&route.children, &full, names, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::RouteMeta;

    fn route(path: &str, component: &str, name: Option<&str>) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            component: component.to_string(),
            name: name.map(str::to_string),
            meta: RouteMeta::default(),
            before_enter: Vec::new(),
            before_leave: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = RouterConfig::default();
        let mut user = route("/user/:id", "User", Some("user"));
        user.children.push(route("profile", "UserProfile", Some("profile")));
        config.routes.push(route("/", "Home", Some("home")));
        config.routes.push(user);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.navigation.callback_timeout_ms = Some(0);
        let mut parent = route("/user/:id", "User", Some("dup"));
        parent.children.push(route(":id", "", Some("dup")));
        config.routes.push(parent);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::DuplicateName("dup".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::EmptyComponent { path } if path == "/user/:id/:id")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::Pattern(PatternError::DuplicateParam { .. }))));
    }
}
