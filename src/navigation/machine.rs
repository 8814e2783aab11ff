//! The navigation state machine.
//!
//! # Transaction
//! ```text
//! navigate(path)
//!     → claim the in-flight flag (else reject, no queuing)
//!     → RouteTable::resolve + query parsing → candidate RouteContext
//!     → before_each hooks
//!     → leave guards of the current leaf → enter guards of the candidate leaf
//!     → middleware pipeline
//!     → commit (previous := current, current := candidate, history += candidate)
//!     → after_each hooks
//!     → push/replace on the history collaborator
//!     → release the flag
//! ```
//!
//! # Design Decisions
//! - The in-flight flag is the only concurrency primitive; it is released by a drop
//!   guard, so an aborted, faulted or dropped navigation never leaves it set
//! - State is published whole through `ArcSwap`; readers never see a partial commit
//! - Every failure is logged and counted, then reported to the caller as `false`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::NavigationConfig;
use crate::navigation::context::{RouteContext, RouterState, Transition};
use crate::navigation::error::NavigationError;
use crate::navigation::guards::GuardExecutor;
use crate::navigation::history::NavigationHistory;
use crate::navigation::hooks::{Hook, HookDispatcher, HookStage};
use crate::navigation::middleware::{Middleware, MiddlewarePipeline};
use crate::observability::metrics;
use crate::routing::matcher::normalize_path;
use crate::routing::query::{parse_query, to_query_string};
use crate::routing::route::Route;
use crate::routing::table::{ResolvedRoute, RouteEntry, RouteTable};
use crate::routing::PatternError;

/// Options for a single navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the collaborator's current entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Holds the in-flight flag for the duration of one navigation.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
    history: Option<Arc<dyn NavigationHistory>>,
    callback_timeout: Option<Duration>,
}

impl RouterBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    pub fn history(mut self, history: Arc<dyn NavigationHistory>) -> Self {
        self.history = Some(history);
        self
    }

    /// Deadline applied to every guard, middleware chain and hook.
    pub fn callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = Some(timeout);
        self
    }

    /// Apply navigation settings from a loaded config.
    pub fn config(mut self, config: &NavigationConfig) -> Self {
        self.callback_timeout = config.callback_timeout();
        self
    }

    pub fn build(self) -> Result<Router, PatternError> {
        let table = RouteTable::new(self.routes)?;
        if table.is_empty() {
            tracing::warn!("Router built without routes; every navigation will fail");
        }
        tracing::debug!(routes = table.len(), "Route table compiled");

        Ok(Router {
            table,
            guards: GuardExecutor::new(self.callback_timeout),
            middleware: MiddlewarePipeline::new(self.callback_timeout),
            hooks: HookDispatcher::new(self.callback_timeout),
            history: self.history,
            state: ArcSwap::from_pointee(RouterState::default()),
            in_flight: AtomicBool::new(false),
        })
    }
}

/// A caller-owned navigation engine.
///
/// `Router` is `Send + Sync`; share it behind an `Arc` if several tasks navigate.
/// Only one navigation runs at a time: a call made while another is in flight
/// returns `false` without waiting.
pub struct Router {
    table: RouteTable,
    guards: GuardExecutor,
    middleware: MiddlewarePipeline,
    hooks: HookDispatcher,
    history: Option<Arc<dyn NavigationHistory>>,
    state: ArcSwap<RouterState>,
    in_flight: AtomicBool,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// A headless router over `routes`.
    pub fn new(routes: Vec<Route>) -> Result<Self, PatternError> {
        Self::builder().routes(routes).build()
    }

    /// Navigate to `path`. Returns whether the navigation committed.
    pub async fn navigate(&self, path: &str, options: NavigateOptions) -> bool {
        let nav_id = Uuid::new_v4();
        let span = tracing::info_span!("navigate", %nav_id, path);
        let started = Instant::now();

        let result = self.run_transaction(path, options).instrument(span).await;

        let outcome = match &result {
            Ok(()) => "committed",
            Err(err) => err.outcome(),
        };
        metrics::record_navigation(outcome, started.elapsed());
        result.is_ok()
    }

    /// `navigate(path)` with a history push.
    pub async fn push(&self, path: &str) -> bool {
        self.navigate(path, NavigateOptions::default()).await
    }

    /// `navigate(path)` replacing the current history entry.
    pub async fn replace(&self, path: &str) -> bool {
        self.navigate(path, NavigateOptions::replace()).await
    }

    async fn run_transaction(&self, path: &str, options: NavigateOptions) -> Result<(), NavigationError> {
        let _in_flight = InFlight::claim(&self.in_flight).ok_or_else(|| {
            tracing::debug!("Navigation rejected: another navigation is in flight");
            NavigationError::ConcurrentNavigation
        })?;

        let candidate = self.build_candidate(path).ok_or_else(|| {
            tracing::debug!("No route matches");
            NavigationError::NoMatch(path.to_string())
        })?;

        let transition = Transition {
            to: Arc::clone(&candidate),
            from: self.state.load().current.clone(),
        };

        self.hooks.run_before(&transition).await;

        if let Err(err) = self.check_guards(&transition).await {
            tracing::warn!(error = %err, "Navigation rejected by guard");
            return Err(err);
        }

        if let Err(failure) = self.middleware.run(Arc::clone(&candidate)).await {
            metrics::record_callback_fault("middleware");
            tracing::warn!(error = %failure, "Middleware failed, navigation aborted");
            return Err(NavigationError::CallbackFault {
                stage: "middleware",
                failure,
            });
        }

        self.commit(Arc::clone(&candidate));

        self.hooks.run_after(&transition).await;

        if let Some(history) = &self.history {
            if options.replace {
                history.replace_entry(&candidate, &candidate.full_path);
            } else {
                history.push_entry(&candidate, &candidate.full_path);
            }
        }

        tracing::info!(
            route = %candidate.pattern,
            component = %candidate.component,
            replace = options.replace,
            "Navigation committed"
        );
        Ok(())
    }

    async fn check_guards(&self, transition: &Transition) -> Result<(), NavigationError> {
        if let Some(leaving) = transition.from.as_ref().and_then(|from| from.leaf()) {
            self.guards
                .run_leave(leaving, transition)
                .await
                .map_err(NavigationError::GuardRejected)?;
        }

        if let Some(entering) = transition.to.leaf() {
            self.guards
                .run_enter(entering, transition)
                .await
                .map_err(NavigationError::GuardRejected)?;
        }
        Ok(())
    }

    /// Resolve `raw` into a candidate context. `raw` may carry `?query` and `#fragment`.
    fn build_candidate(&self, raw: &str) -> Option<Arc<RouteContext>> {
        let (pathname, inline_query) = split_location(raw);
        let resolved = self.table.resolve(pathname)?;

        let query = match inline_query {
            Some(query) => parse_query(query),
            None => self
                .history
                .as_ref()
                .map(|history| parse_query(&history.get_query()))
                .unwrap_or_default(),
        };

        // Only an inline query is reflected in the URL; the ambient one belongs to the old location.
        let path = normalize_path(pathname);
        let full_path = if inline_query.is_some() && !query.is_empty() {
            format!("{}?{}", path, to_query_string(&query))
        } else {
            path.clone()
        };

        Some(Arc::new(RouteContext {
            path,
            full_path,
            pattern: resolved.pattern,
            name: resolved.route.name().map(str::to_string),
            component: resolved.route.component().to_string(),
            params: resolved.params,
            query,
            meta: resolved.route.meta().clone(),
            matched: resolved.matched,
        }))
    }

    fn commit(&self, candidate: Arc<RouteContext>) {
        self.state.rcu(|state| state.committed(Arc::clone(&candidate)));
    }

    /// Step back in the host's history, if there is a collaborator.
    pub fn back(&self) {
        if let Some(history) = &self.history {
            history.back();
        }
    }

    /// Step forward in the host's history, if there is a collaborator.
    pub fn forward(&self) {
        if let Some(history) = &self.history {
            history.forward();
        }
    }

    /// Register a middleware. Applies to navigations started afterwards.
    pub fn use_middleware<M: Middleware>(&self, middleware: M) -> &Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    pub fn before_each<H: Hook>(&self, hook: H) -> &Self {
        self.hooks.add(HookStage::BeforeEach, Arc::new(hook));
        self
    }

    pub fn after_each<H: Hook>(&self, hook: H) -> &Self {
        self.hooks.add(HookStage::AfterEach, Arc::new(hook));
        self
    }

    /// A snapshot of the navigation state.
    pub fn state(&self) -> RouterState {
        let mut snapshot = RouterState::clone(&self.state.load());
        snapshot.is_navigating = self.in_flight.load(Ordering::Acquire);
        snapshot
    }

    pub fn is_navigating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn current_route(&self) -> Option<Arc<RouteContext>> {
        self.state.load().current.clone()
    }

    /// Every declared route in pre-order.
    pub fn all_routes(&self) -> Vec<Arc<Route>> {
        self.table.flatten()
    }

    /// Every declared route in pre-order, with full patterns.
    pub fn route_entries(&self) -> Vec<RouteEntry> {
        self.table.entries()
    }

    /// Look up what `path` would match, without navigating or running any callback.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let (pathname, _) = split_location(path);
        self.table.resolve(pathname)
    }

    pub fn route_by_name(&self, name: &str) -> Option<Arc<Route>> {
        self.table.find_by_name(name)
    }

    /// Truncate the history down to the current entry.
    ///
    /// The engine itself only ever appends; trimming is left to the host.
    pub fn reset_history(&self) {
        self.state.rcu(|state| {
            let mut next = RouterState::clone(state);
            next.history = next.current.iter().cloned().collect();
            next
        });
    }
}

/// Split `path?query#fragment` into the pathname and the optional query; the fragment is dropped.
fn split_location(raw: &str) -> (&str, Option<&str>) {
    let without_fragment = raw.split_once('#').map_or(raw, |(head, _)| head);
    match without_fragment.split_once('?') {
        Some((pathname, query)) => (pathname, Some(query)),
        None => (without_fragment, None),
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("middleware", &self.middleware)
            .field("hooks", &self.hooks)
            .field("has_history", &self.history.is_some())
            .field("is_navigating", &self.is_navigating())
            .finish()
    }
}
