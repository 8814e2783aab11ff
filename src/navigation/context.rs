//! Navigation snapshots: the resolved target of a navigation and the router state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::routing::route::{Route, RouteMeta};

/// Immutable description of a resolved navigation target.
///
/// Built once per `navigate` call after a match is found. It is either committed to
/// [`RouterState`] as a whole or dropped with the failed transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteContext {
    /// Normalized pathname, never carrying a trailing separator unless root.
    pub path: String,
    /// `path` plus the serialized query, as reflected to the history collaborator.
    pub full_path: String,
    /// Full pattern of the matched leaf, parents joined in.
    pub pattern: String,
    pub name: Option<String>,
    pub component: String,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub meta: RouteMeta,
    /// Root-to-leaf chain of matched routes.
    #[serde(serialize_with = "serialize_chain")]
    pub matched: Vec<Arc<Route>>,
}

impl RouteContext {
    /// The matched leaf route.
    pub fn leaf(&self) -> Option<&Arc<Route>> {
        self.matched.last()
    }

    /// The route directly above the leaf in the matched chain.
    pub fn parent(&self) -> Option<&Arc<Route>> {
        let index = self.matched.len().checked_sub(2)?;
        self.matched.get(index)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

fn serialize_chain<S: Serializer>(chain: &[Arc<Route>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(chain.iter().map(|route| route.component()))
}

/// The `(to, from)` pair handed to guards and hooks.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Candidate target of the navigation.
    pub to: Arc<RouteContext>,
    /// The committed route being left, if any.
    pub from: Option<Arc<RouteContext>>,
}

/// Snapshot of the navigation state.
///
/// `history` only grows on committed navigations, and `current` is always its last
/// entry once anything has been committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouterState {
    pub current: Option<Arc<RouteContext>>,
    pub previous: Option<Arc<RouteContext>>,
    pub is_navigating: bool,
    pub history: Vec<Arc<RouteContext>>,
}

impl RouterState {
    /// Returns the state after committing `candidate`.
    pub(crate) fn committed(&self, candidate: Arc<RouteContext>) -> Self {
        let mut history = self.history.clone();
        history.push(Arc::clone(&candidate));
        Self {
            previous: self.current.clone(),
            current: Some(candidate),
            is_navigating: false,
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(path: &str, chain: Vec<Arc<Route>>) -> Arc<RouteContext> {
        Arc::new(RouteContext {
            path: path.to_string(),
            full_path: path.to_string(),
            pattern: path.to_string(),
            name: None,
            component: chain
                .last()
                .map(|r| r.component().to_string())
                .unwrap_or_default(),
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            meta: RouteMeta::default(),
            matched: chain,
        })
    }

    #[test]
    fn test_parent_lookup() {
        let parent = Arc::new(Route::new("/user/:id", "User"));
        let leaf = Arc::new(Route::new("profile", "UserProfile"));
        let ctx = context("/user/1/profile", vec![parent.clone(), leaf.clone()]);

        assert_eq!(ctx.leaf(), Some(&leaf));
        assert_eq!(ctx.parent(), Some(&parent));

        let single = context("/", vec![Arc::new(Route::new("/", "Home"))]);
        assert!(single.parent().is_none());
    }

    #[test]
    fn test_commit_appends() {
        let home = context("/", vec![Arc::new(Route::new("/", "Home"))]);
        let about = context("/about", vec![Arc::new(Route::new("/about", "About"))]);

        let s1 = RouterState::default().committed(home.clone());
        assert_eq!(s1.current, Some(home.clone()));
        assert!(s1.previous.is_none());
        assert_eq!(s1.history.len(), 1);

        let s2 = s1.committed(about.clone());
        assert_eq!(s2.previous, Some(home));
        assert_eq!(s2.current.as_ref(), s2.history.last());
        assert_eq!(s2.history.len(), 2);
    }

    #[test]
    fn test_serialize_chain_as_components() {
        let ctx = context("/", vec![Arc::new(Route::new("/", "Home"))]);
        let json = serde_json::to_value(ctx.as_ref()).unwrap();
        assert_eq!(json["matched"], serde_json::json!(["Home"]));
    }
}
