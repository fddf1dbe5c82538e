//! Execution-strategy units.
//!
//! Three unit kinds share the same workload and logging shape and
//! differ only in their execution discipline:
//!
//! - [`Worker`] — unsynchronized; concurrent invocations interleave
//!   freely.
//! - [`Actor`] — serialized; at most one method body in flight per
//!   instance, with the slot released across suspension points.
//! - [`OffloadWorker`] — hands the blocking compute to a bounded QoS
//!   pool and suspends until it completes.
//!
//! Every unit owns exactly one [`Logger`](schedlab_core::Logger),
//! created at construction, and logs a start line on entry and an end
//! line on exit of each method.

pub mod actor;
pub mod offload;
pub mod worker;

pub use actor::Actor;
pub use offload::OffloadWorker;
pub use worker::Worker;
