//! Shared leaf types for the schedlab concurrency testbed.
//!
//! This crate carries everything the execution-strategy units and the
//! driver have in common: the identity-tagged [`Logger`] and its sinks,
//! the per-thread registry behind the log line's thread descriptor, the
//! simulated workload primitives, cooperative cancellation, the error
//! taxonomy, and configuration.

pub mod cancel;
pub mod config;
pub mod error;
pub mod identity;
pub mod logger;
pub mod threads;
pub mod workload;

pub use cancel::CancelToken;
pub use config::{LabConfig, PoolsConfig, SchedulerConfig, WorkloadConfig};
pub use error::LabError;
pub use identity::{IdSequence, WorkerIdentity};
pub use logger::{LogSink, Logger, MemorySink, StdoutSink};
