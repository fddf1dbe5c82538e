//! Unsynchronized worker unit.

use std::sync::Arc;
use std::time::Duration;

use schedlab_core::{workload, CancelToken, LabError, Logger};

/// Plain value-type execution unit. Imposes no serialization: two
/// concurrent invocations on the same instance (or different instances)
/// may overlap arbitrarily.
#[derive(Debug, Clone)]
pub struct Worker {
    logger: Logger,
    cancel: Arc<CancelToken>,
}

impl Worker {
    pub fn new(logger: Logger, cancel: Arc<CancelToken>) -> Self {
        Self { logger, cancel }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Blocking compute, no suspension point.
    pub async fn run(&self, compute: Duration) -> Result<(), LabError> {
        if self.cancel.is_cancelled() {
            return Err(LabError::Cancelled);
        }
        self.logger.log("🟢 worker compute start");
        workload::compute(&self.logger, compute);
        self.logger.log("🛑 worker compute end");
        Ok(())
    }

    /// Blocking compute followed by a cooperative sleep.
    pub async fn run_and_suspend(
        &self,
        compute: Duration,
        sleep: Duration,
    ) -> Result<(), LabError> {
        if self.cancel.is_cancelled() {
            return Err(LabError::Cancelled);
        }
        self.logger.log("🟢 worker compute+sleep start");
        workload::compute(&self.logger, compute);
        self.logger.log("🥱 worker compute+sleep await");
        workload::cooperative_sleep(&self.cancel, sleep).await?;
        self.logger.log("🛑 worker compute+sleep end");
        Ok(())
    }

    /// Pure cooperative sleep, no compute.
    pub async fn sleep_only(&self, sleep: Duration) -> Result<(), LabError> {
        self.logger.log("🟢 worker sleep start");
        workload::cooperative_sleep(&self.cancel, sleep).await?;
        self.logger.log("🛑 worker sleep end");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use schedlab_core::{MemorySink, WorkerIdentity};

    use super::*;

    fn worker(sink: &Arc<MemorySink>, cancel: Arc<CancelToken>) -> Worker {
        Worker::new(Logger::new(WorkerIdentity::new(1), sink.clone()), cancel)
    }

    #[tokio::test]
    async fn run_logs_start_compute_end() {
        let sink = MemorySink::new();
        let w = worker(&sink, Arc::new(CancelToken::new()));
        w.run(Duration::from_millis(5)).await.unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("worker compute start"));
        assert!(lines[1].contains("computing"));
        assert!(lines[2].contains("worker compute end"));
    }

    #[tokio::test]
    async fn run_and_suspend_logs_the_await_between_compute_and_end() {
        let sink = MemorySink::new();
        let w = worker(&sink, Arc::new(CancelToken::new()));
        w.run_and_suspend(Duration::from_millis(5), Duration::from_millis(5))
            .await
            .unwrap();

        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("await"));
        assert!(lines[3].contains("worker compute+sleep end"));
    }

    #[tokio::test]
    async fn cancelled_sleep_skips_end_line() {
        let sink = MemorySink::new();
        let cancel = Arc::new(CancelToken::new());
        let w = worker(&sink, Arc::clone(&cancel));
        cancel.cancel();

        let result = w.sleep_only(Duration::from_secs(30)).await;
        assert!(matches!(result, Err(LabError::Cancelled)));
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("worker sleep start"));
    }
}
