//! Bounded QoS worker pools for offloaded blocking work.
//!
//! One explicitly-sized pool per QoS class, modeled as a rayon
//! `ThreadPool` with observable queue counters rather than any
//! runtime's opaque default pool. Submissions beyond capacity queue
//! inside the pool; there is no backpressure signal beyond latency.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use schedlab_core::{threads, LabError, PoolsConfig};

/// QoS class selecting which offload pool runs a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolClass {
    Background,
    Utility,
    UserInitiated,
    UserInteractive,
}

impl PoolClass {
    pub const ALL: [PoolClass; 4] = [
        PoolClass::Background,
        PoolClass::Utility,
        PoolClass::UserInitiated,
        PoolClass::UserInteractive,
    ];

    /// Label the thread descriptor reports for this class.
    pub fn qos_label(&self) -> &'static str {
        match self {
            PoolClass::Background => ".background",
            PoolClass::Utility => ".utility",
            PoolClass::UserInitiated => ".userInitiated",
            PoolClass::UserInteractive => ".userInteractive",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PoolClass::Background => "background",
            PoolClass::Utility => "utility",
            PoolClass::UserInitiated => "user-initiated",
            PoolClass::UserInteractive => "user-interactive",
        }
    }
}

impl FromStr for PoolClass {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "background" => Ok(PoolClass::Background),
            "utility" => Ok(PoolClass::Utility),
            "user-initiated" => Ok(PoolClass::UserInitiated),
            "user-interactive" => Ok(PoolClass::UserInteractive),
            other => Err(LabError::Config(format!("unknown pool class: {other}"))),
        }
    }
}

impl std::fmt::Display for PoolClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Point-in-time view of one pool's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Jobs submitted but not yet started.
    pub queued: usize,
    /// Jobs currently running on a pool thread.
    pub active: usize,
    /// Jobs finished since the pool was built.
    pub completed: usize,
}

/// One bounded worker pool with observable counters.
pub struct WorkPool {
    class: PoolClass,
    threads: usize,
    pool: rayon::ThreadPool,
    queued: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl WorkPool {
    /// Build a pool of `threads` workers for `class`. Worker threads
    /// register their QoS label before taking any work so their log
    /// descriptors are correct from the first line.
    pub fn new(class: PoolClass, threads: usize) -> Result<Self, LabError> {
        let label = class.qos_label();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("{}-{}", class.name(), i))
            .start_handler(move |_| threads::set_qos_label(label))
            .build()
            .map_err(|e| LabError::PoolSubmissionFailed(format!("failed to build pool: {e}")))?;
        info!(class = class.name(), threads, "offload pool built");
        Ok(Self {
            class,
            threads,
            pool,
            queued: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn class(&self) -> PoolClass {
        self.class
    }

    /// Configured concurrency bound.
    pub fn capacity(&self) -> usize {
        self.threads
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            queued: self.queued.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
        }
    }

    /// Hand `job` to the pool. Returns as soon as the job is queued;
    /// jobs beyond capacity wait inside the pool.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        let queued = Arc::clone(&self.queued);
        let active = Arc::clone(&self.active);
        let completed = Arc::clone(&self.completed);
        self.pool.spawn(move || {
            queued.fetch_sub(1, Ordering::Relaxed);
            active.fetch_add(1, Ordering::Relaxed);
            job();
            active.fetch_sub(1, Ordering::Relaxed);
            completed.fetch_add(1, Ordering::Relaxed);
        });
    }
}

impl std::fmt::Debug for WorkPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkPool")
            .field("class", &self.class)
            .field("threads", &self.threads)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// The full set of QoS pools, one per class.
///
/// `shutdown` drops the pools; later submissions fail with
/// [`LabError::PoolSubmissionFailed`].
pub struct QosPools {
    inner: RwLock<Option<[WorkPool; 4]>>,
}

impl QosPools {
    pub fn new(config: &PoolsConfig) -> Result<Arc<Self>, LabError> {
        let pools = [
            WorkPool::new(PoolClass::Background, config.background)?,
            WorkPool::new(PoolClass::Utility, config.utility)?,
            WorkPool::new(PoolClass::UserInitiated, config.user_initiated)?,
            WorkPool::new(PoolClass::UserInteractive, config.user_interactive)?,
        ];
        Ok(Arc::new(Self {
            inner: RwLock::new(Some(pools)),
        }))
    }

    fn index(class: PoolClass) -> usize {
        match class {
            PoolClass::Background => 0,
            PoolClass::Utility => 1,
            PoolClass::UserInitiated => 2,
            PoolClass::UserInteractive => 3,
        }
    }

    /// Submit `job` to the pool for `class`.
    pub fn submit(
        &self,
        class: PoolClass,
        job: impl FnOnce() + Send + 'static,
    ) -> Result<(), LabError> {
        let guard = self
            .inner
            .read()
            .map_err(|e| LabError::PoolSubmissionFailed(format!("pool lock poisoned: {e}")))?;
        match guard.as_ref() {
            Some(pools) => {
                debug!(class = class.name(), "submitting offload job");
                pools[Self::index(class)].submit(job);
                Ok(())
            }
            None => Err(LabError::PoolSubmissionFailed(format!(
                "pool {} is shut down",
                class.name()
            ))),
        }
    }

    pub fn snapshot(&self, class: PoolClass) -> Option<PoolSnapshot> {
        let guard = self.inner.read().ok()?;
        guard.as_ref().map(|pools| pools[Self::index(class)].snapshot())
    }

    pub fn capacity(&self, class: PoolClass) -> Option<usize> {
        let guard = self.inner.read().ok()?;
        guard.as_ref().map(|pools| pools[Self::index(class)].capacity())
    }

    /// Drop all pools. In-flight jobs finish; new submissions fail.
    pub fn shutdown(&self) {
        info!("offload pools shutting down");
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

impl std::fmt::Debug for QosPools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QosPools").finish_non_exhaustive()
    }
}
