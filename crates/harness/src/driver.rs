//! Scheduling driver.
//!
//! Takes a materialized [`ExperimentSpec`], builds the units the
//! strategy calls for, fans out the logical tasks, and returns without
//! awaiting them — the log stream is the deliverable, not a result
//! value. Failures inside a task are caught at the task boundary,
//! logged with a `‼️` marker through that task's logger, and never
//! reach siblings or the driver.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use schedlab_core::{
    CancelToken, IdSequence, LabConfig, LabError, LogSink, Logger, StdoutSink, WorkerIdentity,
};

use crate::catalog::{ExperimentSpec, Strategy};
use crate::pool::QosPools;
use crate::unit::{Actor, OffloadWorker, Worker};

/// Id reserved for marker tasks; real workers start at 1.
const MARKER_ID: usize = 0;

/// Owns the id sequence, the offload pools, and the log sink; launches
/// experiments against them.
pub struct Driver {
    pools: Arc<QosPools>,
    ids: IdSequence,
    sink: Arc<dyn LogSink>,
}

impl Driver {
    /// Driver logging to stdout, pools sized from `config`.
    pub fn new(config: &LabConfig) -> Result<Self, LabError> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    /// Driver logging to an explicit sink (tests use a memory sink).
    pub fn with_sink(config: &LabConfig, sink: Arc<dyn LogSink>) -> Result<Self, LabError> {
        Ok(Self {
            pools: QosPools::new(&config.pools)?,
            ids: IdSequence::starting_at(1),
            sink,
        })
    }

    pub fn pools(&self) -> Arc<QosPools> {
        Arc::clone(&self.pools)
    }

    fn next_logger(&self) -> Logger {
        Logger::new(self.ids.next(), Arc::clone(&self.sink))
    }

    fn marker_logger(&self) -> Logger {
        Logger::new(WorkerIdentity::new(MARKER_ID), Arc::clone(&self.sink))
    }

    /// Launch `spec`: spawn its logical tasks and return immediately.
    ///
    /// The returned handle can cancel the launch's suspended tasks or
    /// await completion; dropping it detaches the tasks (fire-and-forget
    /// is the normal mode).
    pub fn launch(&self, spec: &ExperimentSpec) -> LaunchHandle {
        info!(
            strategy = ?spec.strategy,
            tasks = spec.task_count,
            priority = spec.priority.name(),
            pool_class = spec.pool_class.name(),
            "launching experiment"
        );

        let cancel = Arc::new(CancelToken::new());
        let mut tasks = Vec::with_capacity(spec.task_count + 1);

        match spec.strategy {
            Strategy::ActorCompute => {
                let actor = Arc::new(Actor::new(self.next_logger(), Arc::clone(&cancel)));
                for _ in 0..spec.task_count {
                    let actor = Arc::clone(&actor);
                    let compute = spec.compute;
                    tasks.push(guard_task(actor.logger().clone(), async move {
                        actor.run(compute).await
                    }));
                }
            }
            Strategy::ActorTwoMethods => {
                let actor = Arc::new(Actor::new(self.next_logger(), Arc::clone(&cancel)));
                for i in 0..spec.task_count {
                    let actor = Arc::clone(&actor);
                    let compute = spec.compute;
                    tasks.push(guard_task(actor.logger().clone(), async move {
                        if i % 2 == 0 {
                            actor.run(compute).await
                        } else {
                            actor.run2(compute).await
                        }
                    }));
                }
            }
            Strategy::ActorPerTask => {
                for _ in 0..spec.task_count {
                    let actor = Actor::new(self.next_logger(), Arc::clone(&cancel));
                    let compute = spec.compute;
                    tasks.push(guard_task(actor.logger().clone(), async move {
                        actor.run(compute).await
                    }));
                }
            }
            Strategy::ActorSuspend => {
                let actor = Arc::new(Actor::new(self.next_logger(), Arc::clone(&cancel)));
                for _ in 0..spec.task_count {
                    let actor = Arc::clone(&actor);
                    let (compute, sleep) = (spec.compute, spec.sleep);
                    tasks.push(guard_task(actor.logger().clone(), async move {
                        actor.run_and_suspend(compute, sleep).await
                    }));
                }
            }
            Strategy::WorkerSleep => {
                for _ in 0..spec.task_count {
                    let worker = Worker::new(self.next_logger(), Arc::clone(&cancel));
                    let sleep = spec.sleep;
                    tasks.push(guard_task(worker.logger().clone(), async move {
                        worker.sleep_only(sleep).await
                    }));
                }
            }
            Strategy::WorkerCompute => {
                for _ in 0..spec.task_count {
                    let worker = Worker::new(self.next_logger(), Arc::clone(&cancel));
                    let compute = spec.compute;
                    tasks.push(guard_task(worker.logger().clone(), async move {
                        worker.run(compute).await
                    }));
                }
            }
            Strategy::ManyWorkers => {
                for _ in 0..spec.task_count {
                    let worker = Worker::new(self.next_logger(), Arc::clone(&cancel));
                    let compute = spec.compute;
                    tasks.push(guard_task(worker.logger().clone(), async move {
                        worker.run(compute).await
                    }));
                }
                tasks.push(self.spawn_marker());
            }
            Strategy::ManyOffloaded => {
                for _ in 0..spec.task_count {
                    let worker = OffloadWorker::new(
                        self.next_logger(),
                        Arc::clone(&self.pools),
                        Arc::clone(&cancel),
                    );
                    let (compute, class) = (spec.compute, spec.pool_class);
                    tasks.push(guard_task(worker.logger().clone(), async move {
                        worker.run_offloaded(compute, class).await
                    }));
                }
                tasks.push(self.spawn_marker());
            }
        }

        LaunchHandle { cancel, tasks }
    }

    /// An independent task that only logs. Whether its line appears
    /// promptly is the observable telling saturated and free schedulers
    /// apart.
    fn spawn_marker(&self) -> tokio::task::JoinHandle<()> {
        let logger = self.marker_logger();
        tokio::spawn(async move {
            logger.log("⚠️ marker task");
        })
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver").finish_non_exhaustive()
    }
}

/// Spawn `body` with the task-boundary failure policy: an error is
/// logged through the task's own logger and swallowed there.
fn guard_task<F>(logger: Logger, body: F) -> tokio::task::JoinHandle<()>
where
    F: Future<Output = Result<(), LabError>> + Send + 'static,
{
    tokio::spawn(async move {
        match body.await {
            Ok(()) => {}
            Err(LabError::Cancelled) => {
                logger.log("‼️ task cancelled");
                warn!(id = logger.identity().id(), "logical task cancelled");
            }
            Err(e @ LabError::InvariantViolation(_)) => {
                logger.log("‼️ invariant violation");
                error!(id = logger.identity().id(), error = %e, "fatal harness bug");
            }
            Err(e) => {
                logger.log("‼️ task failed");
                warn!(id = logger.identity().id(), error = %e, "logical task failed");
            }
        }
    })
}

/// Handle to one launch. Dropping it detaches the tasks.
#[derive(Debug)]
pub struct LaunchHandle {
    cancel: Arc<CancelToken>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl LaunchHandle {
    /// Cooperatively cancel the launch's suspended tasks. Busy computes
    /// run to their next method boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> Arc<CancelToken> {
        Arc::clone(&self.cancel)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every task of the launch to terminate. Tests use this;
    /// the CLI deliberately does not (it waits wall-clock instead).
    pub async fn join(self) {
        for task in self.tasks {
            let _ = task.await;
        }
    }
}
