//! Fault isolation for user-supplied callbacks.
//!
//! Guards, middleware and hooks are foreign code running inside a navigation. A
//! callback that errors, panics or overruns its deadline must not take the router
//! down with it, so every invocation goes through [`isolate`].

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use thiserror::Error;

use crate::resilience::timeouts::with_timeout;

/// Error type returned by navigation callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a callback did not produce a value.
#[derive(Debug, Error)]
pub enum CallbackFailure {
    #[error("returned an error: {0}")]
    Error(BoxError),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Run a callback future, converting errors, panics and timeouts into [`CallbackFailure`].
pub async fn isolate<F, T>(fut: F, limit: Option<Duration>) -> Result<T, CallbackFailure>
where
    F: Future<Output = Result<T, BoxError>>,
{
    match with_timeout(AssertUnwindSafe(fut).catch_unwind(), limit).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(err))) => Err(CallbackFailure::Error(err)),
        Ok(Err(payload)) => Err(CallbackFailure::Panicked(panic_message(payload.as_ref()))),
        Err(elapsed) => Err(CallbackFailure::TimedOut(elapsed)),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_value_through() {
        let out = isolate(async { Ok::<_, BoxError>(3) }, None).await;
        assert_eq!(out.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_error() {
        let out = isolate(async { Err::<(), BoxError>("nope".into()) }, None).await;
        assert!(matches!(out, Err(CallbackFailure::Error(e)) if e.to_string() == "nope"));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let out = isolate(
            async {
                if true {
                    panic!("guard exploded");
                }
                Ok::<(), BoxError>(())
            },
            None,
        )
        .await;
        assert!(matches!(out, Err(CallbackFailure::Panicked(msg)) if msg == "guard exploded"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let out = isolate(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), BoxError>(())
            },
            Some(Duration::from_millis(5)),
        )
        .await;
        assert!(matches!(out, Err(CallbackFailure::TimedOut(_))));
    }
}
