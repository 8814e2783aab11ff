//! Onion-composed navigation middleware.
//!
//! # Responsibilities
//! - Keep an ordered, appendable middleware list
//! - Compose the list into one invocation per navigation
//!
//! # Design Decisions
//! - Code before `next.run()` runs in registration order; code after it unwinds LIFO
//! - A middleware that never calls `next` only cuts off downstream middleware;
//!   the navigation still commits because guards already authorized it
//! - Registration is lock-free (`ArcSwap`); a running navigation keeps the list it started with

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::navigation::context::RouteContext;
use crate::resilience::isolation::{isolate, BoxError, CallbackFailure};

/// An instrumentation step wrapped around an authorized navigation.
///
/// Implemented for any `Fn(Arc<RouteContext>, Next) -> impl Future<Output = Result<(), BoxError>>`.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, ctx: Arc<RouteContext>, next: Next) -> BoxFuture<'static, Result<(), BoxError>>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Arc<RouteContext>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn handle(&self, ctx: Arc<RouteContext>, next: Next) -> BoxFuture<'static, Result<(), BoxError>> {
        self(ctx, next).boxed()
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Handle to the rest of the middleware chain.
pub struct Next {
    chain: Arc<[SharedMiddleware]>,
    index: usize,
    ctx: Arc<RouteContext>,
}

impl Next {
    /// Run every downstream middleware. Resolves once the innermost one has returned.
    pub fn run(self) -> BoxFuture<'static, Result<(), BoxError>> {
        match self.chain.get(self.index).cloned() {
            Some(middleware) => {
                let next = Next {
                    chain: Arc::clone(&self.chain),
                    index: self.index + 1,
                    ctx: Arc::clone(&self.ctx),
                };
                middleware.handle(self.ctx, next)
            }
            None => async { Ok(()) }.boxed(),
        }
    }

    /// Number of middleware still to run after the caller.
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Ordered middleware stack.
pub struct MiddlewarePipeline {
    stack: ArcSwap<Vec<SharedMiddleware>>,
    timeout: Option<Duration>,
}

impl MiddlewarePipeline {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            stack: ArcSwap::from_pointee(Vec::new()),
            timeout,
        }
    }

    /// Append a middleware to the end of the chain.
    pub fn push(&self, middleware: SharedMiddleware) {
        self.stack.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&middleware));
            next
        });
    }

    pub fn len(&self) -> usize {
        self.stack.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the whole chain over `ctx`.
    pub async fn run(&self, ctx: Arc<RouteContext>) -> Result<(), CallbackFailure> {
        let chain: Arc<[SharedMiddleware]> = self.stack.load().iter().cloned().collect();
        if chain.is_empty() {
            return Ok(());
        }

        let next = Next {
            chain,
            index: 0,
            ctx,
        };
        isolate(next.run(), self.timeout).await
    }
}

impl Default for MiddlewarePipeline {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for MiddlewarePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewarePipeline")
            .field("len", &self.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::route::RouteMeta;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn ctx() -> Arc<RouteContext> {
        Arc::new(RouteContext {
            path: "/".into(),
            full_path: "/".into(),
            pattern: "/".into(),
            name: None,
            component: "Home".into(),
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            meta: RouteMeta::default(),
            matched: Vec::new(),
        })
    }

    fn tracer(log: &Log, name: &'static str) -> SharedMiddleware {
        let log = log.clone();
        Arc::new(move |_ctx: Arc<RouteContext>, next: Next| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(format!("{name}-start"));
                next.run().await?;
                log.lock().unwrap().push(format!("{name}-end"));
                Ok::<(), BoxError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_onion_order() {
        let log: Log = Arc::default();
        let pipeline = MiddlewarePipeline::default();
        pipeline.push(tracer(&log, "m1"));
        pipeline.push(tracer(&log, "m2"));
        pipeline.push(tracer(&log, "m3"));

        pipeline.run(ctx()).await.unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["m1-start", "m2-start", "m3-start", "m3-end", "m2-end", "m1-end"]
        );
    }

    #[tokio::test]
    async fn test_not_calling_next_stops_downstream_only() {
        let log: Log = Arc::default();
        let pipeline = MiddlewarePipeline::default();
        pipeline.push(tracer(&log, "m1"));
        let stop_log = log.clone();
        pipeline.push(Arc::new(move |_ctx: Arc<RouteContext>, _next: Next| {
            let log = stop_log.clone();
            async move {
                log.lock().unwrap().push("stop".to_string());
                Ok::<(), BoxError>(())
            }
        }));
        pipeline.push(tracer(&log, "m3"));

        assert!(pipeline.run(ctx()).await.is_ok());
        assert_eq!(*log.lock().unwrap(), vec!["m1-start", "stop", "m1-end"]);
    }

    #[tokio::test]
    async fn test_downstream_error_surfaces() {
        let log: Log = Arc::default();
        let pipeline = MiddlewarePipeline::default();
        pipeline.push(tracer(&log, "m1"));
        pipeline.push(Arc::new(|_ctx: Arc<RouteContext>, _next: Next| async {
            Err::<(), BoxError>("enrichment failed".into())
        }));

        let err = pipeline.run(ctx()).await.unwrap_err();
        assert!(matches!(err, CallbackFailure::Error(_)));
        // m1 propagated the error with `?`, so its post-next code never ran.
        assert_eq!(*log.lock().unwrap(), vec!["m1-start"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = MiddlewarePipeline::default();
        assert!(pipeline.is_empty());
        assert!(pipeline.run(ctx()).await.is_ok());
    }
}
