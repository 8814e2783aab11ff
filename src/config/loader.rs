//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::navigation::guards::GuardRegistry;
use crate::routing::route::Route;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("route `{route}` refers to unknown guard `{guard}`")]
    UnknownGuard { route: String, guard: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Turn declared routes into [`Route`]s, attaching guards by name.
pub fn build_routes(config: &RouterConfig, guards: &GuardRegistry) -> Result<Vec<Route>, ConfigError> {
    config
        .routes
        .iter()
        .map(|route| build_route(route, guards))
        .collect()
}

fn build_route(config: &RouteConfig, guards: &GuardRegistry) -> Result<Route, ConfigError> {
    let mut route = Route::new(&config.path, &config.component).with_meta(config.meta.clone());
    if let Some(name) = &config.name {
        route = route.with_name(name);
    }

    let lookup = |guard: &String| {
        guards.get(guard).ok_or_else(|| ConfigError::UnknownGuard {
            route: config.path.clone(),
            guard: guard.clone(),
        })
    };
    for name in &config.before_enter {
        route = route.with_shared_enter_guard(lookup(name)?);
    }
    for name in &config.before_leave {
        route = route.with_shared_leave_guard(lookup(name)?);
    }

    for child in &config.children {
        route = route.with_child(build_route(child, guards)?);
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::context::Transition;

    const ROUTES: &str = r#"
        [navigation]
        callback_timeout_ms = 250

        [[routes]]
        path = "/"
        component = "Home"
        name = "home"

        [[routes]]
        path = "/admin"
        component = "Admin"
        before_enter = ["auth"]

        [routes.meta]
        title = "Admin"
        requiresAuth = true
        roles = ["admin"]
        sidebar = "collapsed"

        [[routes.children]]
        path = "users/:id"
        component = "AdminUser"
    "#;

    #[test]
    fn test_parse_and_build() {
        let config = parse_config(ROUTES).unwrap();
        assert_eq!(config.navigation.callback_timeout_ms, Some(250));
        assert_eq!(config.navigation.log_level, "info");
        assert_eq!(config.routes.len(), 2);

        let admin = &config.routes[1];
        assert_eq!(admin.meta.requires_auth, Some(true));
        assert_eq!(
            admin.meta.extra.get("sidebar"),
            Some(&serde_json::json!("collapsed"))
        );
        assert_eq!(admin.children[0].component, "AdminUser");

        let mut guards = GuardRegistry::new();
        guards.register("auth", |_t: Transition| async { Ok::<_, crate::resilience::BoxError>(true) });
        let routes = build_routes(&config, &guards).unwrap();
        assert_eq!(routes[1].enter_guards().len(), 1);
        assert_eq!(routes[1].children().len(), 1);
        assert_eq!(routes[0].name(), Some("home"));
    }

    #[test]
    fn test_unknown_guard() {
        let config = parse_config(ROUTES).unwrap();
        let err = build_routes(&config, &GuardRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGuard { guard, .. } if guard == "auth"));
    }

    #[test]
    fn test_validation_failure() {
        let err = parse_config(
            r#"
            [[routes]]
            path = "/files/*rest/more"
            component = "Files"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("rest wildcard"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_config("[[routes]]\npath = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
