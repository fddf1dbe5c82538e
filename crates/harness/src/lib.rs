//! Execution-strategy harness for the schedlab testbed.
//!
//! Wires the leaf primitives from `schedlab-core` into runnable
//! experiments: the execution-strategy units ([`unit`]), the bounded
//! QoS worker pools ([`pool`]), the scheduling driver ([`driver`]) that
//! fans logical tasks out against a unit, and the fixed experiment
//! catalog ([`catalog`]).
//!
//! The only observable artifact of a run is the identity-tagged log
//! stream; expected orderings are properties of the scheduler, and this
//! crate's job is to make them visible reliably.

pub mod catalog;
pub mod driver;
pub mod pool;
pub mod unit;

pub use catalog::{Experiment, ExperimentSpec, Strategy, TaskPriority, CATALOG};
pub use driver::{Driver, LaunchHandle};
pub use pool::{PoolClass, QosPools, WorkPool};
pub use unit::{Actor, OffloadWorker, Worker};
