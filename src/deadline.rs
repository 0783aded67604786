//! Timeout and cancellation for outbound calls

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{Result, TravelPlannerError};

/// Run `call` until it finishes, `timeout` elapses or `cancel` fires,
/// whichever comes first. Cancellation wins ties.
pub async fn with_deadline<F, T>(
    service: &str,
    timeout: Duration,
    cancel: &CancellationToken,
    call: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(TravelPlannerError::cancelled(service)),
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(result) => result,
            Err(_) => Err(TravelPlannerError::timeout(service, timeout)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_in_time() {
        let cancel = CancellationToken::new();
        let value = with_deadline("svc", Duration::from_secs(1), &cancel, async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_times_out() {
        let cancel = CancellationToken::new();
        let err = with_deadline("svc", Duration::from_millis(20), &cancel, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, TravelPlannerError::Timeout { .. }));
        assert_eq!(err.to_string(), "Timed out after 20ms calling svc");
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = with_deadline("svc", Duration::from_secs(5), &cancel, async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, TravelPlannerError::Cancelled { .. }));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let cancel = CancellationToken::new();
        let err = with_deadline::<_, ()>("svc", Duration::from_secs(1), &cancel, async {
            Err(TravelPlannerError::validation("nope"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, TravelPlannerError::Validation { .. }));
    }
}
