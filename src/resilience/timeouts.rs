//! Optional deadlines for navigation callbacks.

use std::future::Future;
use std::time::Duration;

/// Await `fut`, giving up after `limit` if one is set.
///
/// Returns the elapsed limit on timeout.
pub async fn with_timeout<F: Future>(fut: F, limit: Option<Duration>) -> Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_limit() {
        assert_eq!(with_timeout(async { 7 }, None).await, Ok(7));
    }

    #[tokio::test]
    async fn test_elapsed() {
        let slow = tokio::time::sleep(Duration::from_secs(5));
        let limit = Duration::from_millis(10);
        assert_eq!(with_timeout(slow, Some(limit)).await, Err(limit));
    }
}
