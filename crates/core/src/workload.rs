//! Simulated workload primitives.
//!
//! Exactly two, intentionally opposite in suspension behavior:
//! [`compute`] occupies its thread for the full duration and never
//! yields, while [`cooperative_sleep`] suspends the logical task and
//! frees the thread. The entire experiment catalog exists to make the
//! consequences of that difference observable.

use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::error::LabError;
use crate::logger::Logger;

/// CPU-bound busy loop: repeated floating-point exponentiation until
/// wall-clock elapsed reaches `duration`. Logs `computing` once at
/// entry. Never suspends, never yields; this is the designed
/// non-suspension point that starves bounded schedulers.
///
/// The numeric result is discarded; only the elapsed time matters.
pub fn compute(logger: &Logger, duration: Duration) {
    logger.log("⚙️ computing");
    let start = Instant::now();
    let mut iteration: i32 = 1;
    while start.elapsed() < duration {
        std::hint::black_box(std::f64::consts::PI.powi(iteration).sqrt());
        iteration = iteration.wrapping_add(1);
    }
}

/// Suspend the calling logical task for `duration` without blocking the
/// executing thread. Fails with [`LabError::Cancelled`] if `cancel`
/// trips during the suspension.
pub async fn cooperative_sleep(cancel: &CancelToken, duration: Duration) -> Result<(), LabError> {
    if cancel.is_cancelled() {
        return Err(LabError::Cancelled);
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(LabError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::identity::WorkerIdentity;
    use crate::logger::MemorySink;

    use super::*;

    fn test_logger(sink: &Arc<MemorySink>) -> Logger {
        Logger::new(WorkerIdentity::new(0), sink.clone())
    }

    #[test]
    fn compute_runs_for_at_least_the_requested_duration() {
        let sink = MemorySink::new();
        let start = Instant::now();
        compute(&test_logger(&sink), Duration::from_millis(50));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn compute_logs_exactly_once() {
        let sink = MemorySink::new();
        compute(&test_logger(&sink), Duration::from_millis(5));
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("computing"));
    }

    #[tokio::test]
    async fn sleep_completes_when_not_cancelled() {
        let cancel = CancelToken::new();
        cooperative_sleep(&cancel, Duration::from_millis(10))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sleep_fails_when_cancelled_mid_suspension() {
        let cancel = Arc::new(CancelToken::new());
        let trip = {
            let cancel = Arc::clone(&cancel);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancel.cancel();
            })
        };
        let result = cooperative_sleep(&cancel, Duration::from_secs(30)).await;
        assert!(matches!(result, Err(LabError::Cancelled)));
        trip.await.unwrap();
    }

    #[tokio::test]
    async fn sleep_fails_immediately_when_already_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = cooperative_sleep(&cancel, Duration::from_secs(30)).await;
        assert!(matches!(result, Err(LabError::Cancelled)));
    }
}
