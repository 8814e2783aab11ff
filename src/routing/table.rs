//! Route tree ownership and lookup.
//!
//! # Responsibilities
//! - Compile every route's full pattern once, at construction
//! - Resolve a pathname to its matched leaf and root-to-leaf chain
//! - Expose a pre-order flattening of the tree
//!
//! # Design Decisions
//! - Immutable after construction (shareable without locks)
//! - First match wins in depth-first registration order; no specificity ranking
//! - A route is tried directly before its children, and its children before later siblings
//! - Explicit `None` on no match rather than a silent default

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::routing::matcher::{join_patterns, normalize_path, PathMatcher, PatternError};
use crate::routing::route::Route;

#[derive(Debug)]
struct RouteNode {
    route: Arc<Route>,
    matcher: PathMatcher,
    children: Vec<RouteNode>,
}

impl RouteNode {
    fn compile(route: &Arc<Route>, parent_pattern: &str) -> Result<Self, PatternError> {
        let matcher = PathMatcher::compile(&join_patterns(parent_pattern, route.path()))?;
        let children = route
            .children()
            .iter()
            .map(|child| RouteNode::compile(child, matcher.pattern()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            route: Arc::clone(route),
            matcher,
            children,
        })
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    /// The matched leaf.
    pub route: Arc<Route>,
    /// Root-to-leaf chain, ending with `route`.
    pub matched: Vec<Arc<Route>>,
    pub params: BTreeMap<String, String>,
    /// Full pattern of the leaf.
    pub pattern: String,
}

/// One row of the flattened tree.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: String,
    /// Dynamic segment names of `pattern`, in declaration order.
    pub params: Vec<String>,
    /// True when `pattern` has no dynamic segments.
    pub is_static: bool,
    pub depth: usize,
    pub route: Arc<Route>,
}

/// The immutable route forest.
#[derive(Debug)]
pub struct RouteTable {
    roots: Vec<RouteNode>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, PatternError> {
        let roots = routes
            .into_iter()
            .map(|route| RouteNode::compile(&Arc::new(route), "/"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { roots })
    }

    /// Resolve a pathname. Query strings and fragments must already be stripped.
    pub fn resolve(&self, pathname: &str) -> Option<ResolvedRoute> {
        let path = normalize_path(pathname);
        let (chain, params, pattern) = Self::resolve_in(&self.roots, &path)?;
        let route = Arc::clone(chain.last()?);
        Some(ResolvedRoute {
            route,
            matched: chain,
            params,
            pattern,
        })
    }

    fn resolve_in(
        nodes: &[RouteNode],
        path: &str,
    ) -> Option<(Vec<Arc<Route>>, BTreeMap<String, String>, String)> {
        for node in nodes {
            if let Some(params) = node.matcher.matches(path) {
                let pattern = node.matcher.pattern().to_string();
                return Some((vec![Arc::clone(&node.route)], params, pattern));
            }
            if let Some((mut chain, params, pattern)) = Self::resolve_in(&node.children, path) {
                chain.insert(0, Arc::clone(&node.route));
                return Some((chain, params, pattern));
            }
        }
        None
    }

    /// Every route in pre-order.
    pub fn flatten(&self) -> Vec<Arc<Route>> {
        self.entries().into_iter().map(|entry| entry.route).collect()
    }

    /// Every route in pre-order, with its full pattern and depth.
    pub fn entries(&self) -> Vec<RouteEntry> {
        fn walk(nodes: &[RouteNode], depth: usize, out: &mut Vec<RouteEntry>) {
            for node in nodes {
                out.push(RouteEntry {
                    pattern: node.matcher.pattern().to_string(),
                    params: node.matcher.param_names().into_iter().map(str::to_string).collect(),
                    is_static: node.matcher.is_static(),
                    depth,
                    route: Arc::clone(&node.route),
                });
                walk(&node.children, depth + 1, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }

    /// First route (pre-order) registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Route>> {
        self.flatten()
            .into_iter()
            .find(|route| route.name() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
