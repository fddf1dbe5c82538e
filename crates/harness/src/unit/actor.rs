//! Serialized actor unit.
//!
//! The actor owns an exclusion token (a `tokio::sync::Mutex<()>`) that
//! every method body holds while executing. The contract: at most one
//! in-flight body per instance, and suspension yields the slot — a
//! method that suspends drops the token before awaiting and re-acquires
//! it afterwards, so a queued sibling may run during the suspension
//! window. Distinct instances are fully independent.
//!
//! Acquisition order between concurrently submitted bodies is
//! scheduler-defined. (The tokio mutex happens to hand the lock out in
//! FIFO order; nothing here promises or relies on that.)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use schedlab_core::{workload, CancelToken, LabError, Logger};

/// Serialized execution unit: at most one method body in flight.
#[derive(Debug)]
pub struct Actor {
    logger: Logger,
    slot: Mutex<()>,
    in_body: AtomicBool,
    cancel: Arc<CancelToken>,
}

impl Actor {
    pub fn new(logger: Logger, cancel: Arc<CancelToken>) -> Self {
        Self {
            logger,
            slot: Mutex::new(()),
            in_body: AtomicBool::new(false),
            cancel,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Acquire the exclusion slot and mark the body active. A second
    /// body observing the flag already set means the exclusion is
    /// breached, which is a fatal harness bug.
    async fn enter(&self) -> Result<MutexGuard<'_, ()>, LabError> {
        let guard = self.slot.lock().await;
        if self.in_body.swap(true, Ordering::SeqCst) {
            return Err(LabError::InvariantViolation(
                "second body entered while one was active".into(),
            ));
        }
        Ok(guard)
    }

    fn exit(&self, guard: MutexGuard<'_, ()>) {
        self.in_body.store(false, Ordering::SeqCst);
        drop(guard);
    }

    /// Non-suspending method: holds the slot for the full compute, so a
    /// queued sibling starts only after this body returns.
    pub async fn run(&self, compute: Duration) -> Result<(), LabError> {
        let guard = self.enter().await?;
        self.logger.log("🟢 actor compute start");
        workload::compute(&self.logger, compute);
        self.logger.log("🛑 actor compute end");
        self.exit(guard);
        Ok(())
    }

    /// Second non-suspending method with the same discipline; exists to
    /// show that exclusion is per instance, not per method.
    pub async fn run2(&self, compute: Duration) -> Result<(), LabError> {
        let guard = self.enter().await?;
        self.logger.log("🟢 actor compute2 start");
        workload::compute(&self.logger, compute);
        self.logger.log("🛑 actor compute2 end");
        self.exit(guard);
        Ok(())
    }

    /// Compute, then suspend. The slot is released across the sleep, so
    /// a queued sibling may begin during this body's suspension window.
    pub async fn run_and_suspend(
        &self,
        compute: Duration,
        sleep: Duration,
    ) -> Result<(), LabError> {
        let guard = self.enter().await?;
        self.logger.log("🟢 actor compute+sleep start");
        workload::compute(&self.logger, compute);
        self.logger.log("🥱 actor compute+sleep await");
        self.exit(guard);

        let slept = workload::cooperative_sleep(&self.cancel, sleep).await;

        let guard = self.enter().await?;
        let result = slept.map(|()| self.logger.log("🛑 actor compute+sleep end"));
        self.exit(guard);
        result
    }
}

#[cfg(test)]
mod tests {
    use schedlab_core::{MemorySink, WorkerIdentity};

    use super::*;

    fn actor(sink: &Arc<MemorySink>, cancel: Arc<CancelToken>) -> Actor {
        Actor::new(Logger::new(WorkerIdentity::new(1), sink.clone()), cancel)
    }

    #[tokio::test]
    async fn run_logs_start_compute_end() {
        let sink = MemorySink::new();
        let a = actor(&sink, Arc::new(CancelToken::new()));
        a.run(Duration::from_millis(5)).await.unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("actor compute start"));
        assert!(lines[2].contains("actor compute end"));
    }

    #[tokio::test]
    async fn suspended_body_reports_cancellation_without_end_line() {
        let sink = MemorySink::new();
        let cancel = Arc::new(CancelToken::new());
        let a = Arc::new(actor(&sink, Arc::clone(&cancel)));

        let body = {
            let a = Arc::clone(&a);
            tokio::spawn(async move {
                a.run_and_suspend(Duration::from_millis(5), Duration::from_secs(30))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        let result = body.await.unwrap();
        assert!(matches!(result, Err(LabError::Cancelled)));
        assert!(!sink.lines().iter().any(|l| l.contains("compute+sleep end")));
    }

    #[tokio::test]
    async fn slot_reacquires_cleanly_after_suspension() {
        let sink = MemorySink::new();
        let a = actor(&sink, Arc::new(CancelToken::new()));
        a.run_and_suspend(Duration::from_millis(5), Duration::from_millis(5))
            .await
            .unwrap();
        // A later body must find the slot free and the flag clear.
        a.run(Duration::from_millis(5)).await.unwrap();
        assert!(sink.lines().iter().any(|l| l.contains("actor compute end")));
    }
}
