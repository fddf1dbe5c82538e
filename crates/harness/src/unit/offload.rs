//! Pool-offload worker unit.
//!
//! Decouples the blocking compute from the logical-task scheduler by
//! submitting it to a bounded QoS pool and suspending the caller on a
//! oneshot completion signal. The scheduler's threads stay free for the
//! full compute duration; the cost is a second, independently sized
//! pool of true threads.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use schedlab_core::{workload, CancelToken, LabError, Logger};

use crate::pool::{PoolClass, QosPools};

/// Execution unit whose compute runs on a QoS pool thread.
#[derive(Debug, Clone)]
pub struct OffloadWorker {
    logger: Logger,
    pools: Arc<QosPools>,
    cancel: Arc<CancelToken>,
}

impl OffloadWorker {
    pub fn new(logger: Logger, pools: Arc<QosPools>, cancel: Arc<CancelToken>) -> Self {
        Self {
            logger,
            pools,
            cancel,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Submit the compute to the pool for `class` and suspend until it
    /// completes. The `computing` line is logged by the pool thread;
    /// start and end lines come from whichever scheduler thread resumes
    /// this task.
    pub async fn run_offloaded(
        &self,
        compute: Duration,
        class: PoolClass,
    ) -> Result<(), LabError> {
        if self.cancel.is_cancelled() {
            return Err(LabError::Cancelled);
        }
        self.logger.log("🟢 offload compute start");

        let (done_tx, done_rx) = oneshot::channel();
        let logger = self.logger.clone();
        self.pools.submit(class, move || {
            workload::compute(&logger, compute);
            let _ = done_tx.send(());
        })?;

        tokio::select! {
            completed = done_rx => {
                completed.map_err(|_| {
                    LabError::PoolSubmissionFailed("pool dropped the completion signal".into())
                })?;
            }
            _ = self.cancel.cancelled() => {
                // The pool job keeps running to completion; compute is
                // not cancellable mid-loop. Only the waiting task stops.
                return Err(LabError::Cancelled);
            }
        }

        self.logger.log("🛑 offload compute end");
        Ok(())
    }
}
