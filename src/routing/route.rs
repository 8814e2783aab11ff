//! Route declarations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::navigation::guards::{Guard, SharedGuard};

/// Route metadata.
///
/// Recognized keys are typed; anything else lands in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload: Option<bool>,
    /// Extension keys not recognized above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RouteMeta {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Set an extension key.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A path pattern bound to a component, with optional metadata, guards and children.
///
/// Routes are assembled with the `with_*` builder methods and become immutable once
/// handed to a [`Router`](crate::navigation::Router).
#[derive(Clone, Serialize)]
pub struct Route {
    path: String,
    component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    meta: RouteMeta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Arc<Route>>,
    #[serde(skip)]
    before_enter: Vec<SharedGuard>,
    #[serde(skip)]
    before_leave: Vec<SharedGuard>,
}

impl Route {
    pub fn new(path: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            component: component.into(),
            name: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
            before_enter: Vec::new(),
            before_leave: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_child(mut self, child: Route) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Route>) -> Self {
        self.children.extend(children.into_iter().map(Arc::new));
        self
    }

    /// Append a guard that must pass before this route can be entered.
    pub fn with_enter_guard<G: Guard>(self, guard: G) -> Self {
        self.with_shared_enter_guard(Arc::new(guard))
    }

    /// Append a guard that must pass before this route can be left.
    pub fn with_leave_guard<G: Guard>(self, guard: G) -> Self {
        self.with_shared_leave_guard(Arc::new(guard))
    }

    pub fn with_shared_enter_guard(mut self, guard: SharedGuard) -> Self {
        self.before_enter.push(guard);
        self
    }

    pub fn with_shared_leave_guard(mut self, guard: SharedGuard) -> Self {
        self.before_leave.push(guard);
        self
    }

    /// The pattern as declared (relative to the parent for nested routes).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn children(&self) -> &[Arc<Route>] {
        &self.children
    }

    pub fn enter_guards(&self) -> &[SharedGuard] {
        &self.before_enter
    }

    pub fn leave_guards(&self) -> &[SharedGuard] {
        &self.before_leave
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("component", &self.component)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("children", &self.children)
            .field("before_enter", &self.before_enter.len())
            .field("before_leave", &self.before_leave.len())
            .finish()
    }
}

// Guards are opaque, so equality covers the declarative fields only.
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.component == other.component
            && self.name == other.name
            && self.meta == other.meta
            && self.children == other.children
    }
}
