//! Before/after navigation observers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::navigation::context::Transition;
use crate::observability::metrics;
use crate::resilience::isolation::{isolate, BoxError};

/// An observer of navigations. Hooks cannot cancel or alter a navigation.
pub trait Hook: Send + Sync + 'static {
    fn call(&self, transition: Transition) -> BoxFuture<'static, Result<(), BoxError>>;
}

impl<F, Fut> Hook for F
where
    F: Fn(Transition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn call(&self, transition: Transition) -> BoxFuture<'static, Result<(), BoxError>> {
        self(transition).boxed()
    }
}

pub type SharedHook = Arc<dyn Hook>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    BeforeEach,
    AfterEach,
}

impl HookStage {
    pub fn as_str(self) -> &'static str {
        match self {
            HookStage::BeforeEach => "before_each",
            HookStage::AfterEach => "after_each",
        }
    }
}

/// Runs registered hooks sequentially, swallowing (and logging) their failures.
pub struct HookDispatcher {
    before: ArcSwap<Vec<SharedHook>>,
    after: ArcSwap<Vec<SharedHook>>,
    timeout: Option<Duration>,
}

impl HookDispatcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            before: ArcSwap::from_pointee(Vec::new()),
            after: ArcSwap::from_pointee(Vec::new()),
            timeout,
        }
    }

    pub fn add(&self, stage: HookStage, hook: SharedHook) {
        let list = match stage {
            HookStage::BeforeEach => &self.before,
            HookStage::AfterEach => &self.after,
        };
        list.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&hook));
            next
        });
    }

    pub async fn run_before(&self, transition: &Transition) {
        self.run(HookStage::BeforeEach, transition).await;
    }

    pub async fn run_after(&self, transition: &Transition) {
        self.run(HookStage::AfterEach, transition).await;
    }

    /// Returns the number of hooks that failed.
    async fn run(&self, stage: HookStage, transition: &Transition) -> usize {
        let hooks = match stage {
            HookStage::BeforeEach => self.before.load_full(),
            HookStage::AfterEach => self.after.load_full(),
        };

        let mut failed = 0;
        for (index, hook) in hooks.iter().enumerate() {
            let hook = Arc::clone(hook);
            let transition = transition.clone();
            if let Err(failure) = isolate(async move { hook.call(transition).await }, self.timeout).await {
                failed += 1;
                metrics::record_callback_fault(stage.as_str());
                tracing::warn!(
                    stage = stage.as_str(),
                    index,
                    error = %failure,
                    "Navigation hook failed"
                );
            }
        }
        failed
    }
}

impl Default for HookDispatcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDispatcher")
            .field("before", &self.before.load().len())
            .field("after", &self.after.load().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::context::RouteContext;
    use crate::routing::route::RouteMeta;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    fn transition() -> Transition {
        Transition {
            to: Arc::new(RouteContext {
                path: "/about".into(),
                full_path: "/about".into(),
                pattern: "/about".into(),
                name: None,
                component: "About".into(),
                params: BTreeMap::new(),
                query: BTreeMap::new(),
                meta: RouteMeta::default(),
                matched: Vec::new(),
            }),
            from: None,
        }
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> SharedHook {
        let log = log.clone();
        Arc::new(move |t: Transition| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(format!("{label}:{}", t.to.path));
                Ok::<(), BoxError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = HookDispatcher::default();
        hooks.add(HookStage::BeforeEach, recorder(&log, "b1"));
        hooks.add(HookStage::BeforeEach, recorder(&log, "b2"));
        hooks.add(HookStage::AfterEach, recorder(&log, "a1"));

        hooks.run_before(&transition()).await;
        hooks.run_after(&transition()).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["b1:/about", "b2:/about", "a1:/about"]
        );
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = HookDispatcher::default();
        hooks.add(
            HookStage::BeforeEach,
            Arc::new(|_t: Transition| async { Err::<(), BoxError>("analytics offline".into()) }),
        );
        hooks.add(
            HookStage::BeforeEach,
            Arc::new(|_t: Transition| async {
                if true {
                    panic!("hook panicked");
                }
                Ok::<(), BoxError>(())
            }),
        );
        hooks.add(HookStage::BeforeEach, recorder(&log, "b3"));

        let failed = hooks.run(HookStage::BeforeEach, &transition()).await;
        assert_eq!(failed, 2);
        assert_eq!(*log.lock().unwrap(), vec!["b3:/about"]);
    }
}
