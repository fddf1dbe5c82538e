//! The fixed experiment catalog.
//!
//! Each entry is a declarative configuration — strategy, unit sharing,
//! task count, suspension behavior — mirroring one of the buttons in
//! the investigation this testbed reproduces. Expected orderings are
//! properties of the scheduler, not of the harness; the catalog only
//! names the configurations under which they become observable.

use std::str::FromStr;
use std::time::Duration;

use schedlab_core::{LabConfig, LabError};

use crate::pool::PoolClass;

/// How the driver arranges units and method calls for an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One shared actor; every task calls the non-suspending method.
    ActorCompute,
    /// One shared actor; tasks alternate between two methods.
    ActorTwoMethods,
    /// A fresh actor per task; shows per-instance exclusion scope.
    ActorPerTask,
    /// One shared actor; the method computes, then suspends.
    ActorSuspend,
    /// A fresh unsynchronized worker per task; pure cooperative sleep.
    WorkerSleep,
    /// A fresh unsynchronized worker per task; blocking compute.
    WorkerCompute,
    /// Many workers computing on the scheduler, plus a marker task.
    ManyWorkers,
    /// Many workers computing via pool offload, plus a marker task.
    ManyOffloaded,
}

/// Task scheduling hint.
///
/// tokio tasks have no priority, so this never changes how logical
/// tasks are scheduled; it selects the default offload pool class and
/// is recorded on the launch log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskPriority {
    Low,
    #[default]
    Default,
    High,
}

impl TaskPriority {
    pub fn name(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Default => "default",
            TaskPriority::High => "high",
        }
    }

    /// Pool class used when an experiment offloads and none was given.
    pub fn default_pool_class(&self) -> PoolClass {
        match self {
            TaskPriority::Low => PoolClass::Background,
            TaskPriority::Default => PoolClass::Utility,
            TaskPriority::High => PoolClass::UserInitiated,
        }
    }
}

impl FromStr for TaskPriority {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "default" => Ok(TaskPriority::Default),
            "high" => Ok(TaskPriority::High),
            other => Err(LabError::Config(format!("unknown priority: {other}"))),
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Experiment {
    pub name: &'static str,
    pub summary: &'static str,
    pub strategy: Strategy,
    pub default_tasks: usize,
    /// Whether the method bodies contain a suspension point.
    pub suspends: bool,
    /// Whether the strategy targets an offload pool.
    pub uses_pool: bool,
}

/// The fixed set of experiments.
pub const CATALOG: &[Experiment] = &[
    Experiment {
        name: "actor-compute",
        summary: "two tasks, one actor, blocking compute: second body starts after the first ends",
        strategy: Strategy::ActorCompute,
        default_tasks: 2,
        suspends: false,
        uses_pool: false,
    },
    Experiment {
        name: "actor-two-methods",
        summary: "two tasks, one actor, two different methods: still serialized; start order is scheduler-defined",
        strategy: Strategy::ActorTwoMethods,
        default_tasks: 2,
        suspends: false,
        uses_pool: false,
    },
    Experiment {
        name: "two-actors",
        summary: "one task on each of two actors: exclusion is per instance, so both run in parallel",
        strategy: Strategy::ActorPerTask,
        default_tasks: 2,
        suspends: false,
        uses_pool: false,
    },
    Experiment {
        name: "actor-suspend",
        summary: "two tasks, one actor, compute then sleep: the second body may start inside the first's suspension window",
        strategy: Strategy::ActorSuspend,
        default_tasks: 2,
        suspends: true,
        uses_pool: false,
    },
    Experiment {
        name: "worker-sleep",
        summary: "unsynchronized worker, pure cooperative sleep: the thread stays free while suspended",
        strategy: Strategy::WorkerSleep,
        default_tasks: 1,
        suspends: true,
        uses_pool: false,
    },
    Experiment {
        name: "worker-compute",
        summary: "unsynchronized worker, blocking compute: occupies a scheduler thread for the full duration",
        strategy: Strategy::WorkerCompute,
        default_tasks: 1,
        suspends: false,
        uses_pool: false,
    },
    Experiment {
        name: "many-workers",
        summary: "N workers all computing on the scheduler: worker threads saturate and the marker task is delayed",
        strategy: Strategy::ManyWorkers,
        default_tasks: 8,
        suspends: false,
        uses_pool: false,
    },
    Experiment {
        name: "many-offloaded",
        summary: "N workers computing via pool offload: the marker task logs immediately; parallelism is bounded by the pool",
        strategy: Strategy::ManyOffloaded,
        default_tasks: 8,
        suspends: false,
        uses_pool: true,
    },
];

/// Look an experiment up by its catalog name.
pub fn find(name: &str) -> Option<&'static Experiment> {
    CATALOG.iter().find(|e| e.name == name)
}

impl Experiment {
    /// Materialize a launchable spec, applying overrides where given
    /// and config defaults otherwise.
    pub fn spec(
        &self,
        config: &LabConfig,
        tasks: Option<usize>,
        priority: TaskPriority,
        pool_class: Option<PoolClass>,
    ) -> ExperimentSpec {
        ExperimentSpec {
            strategy: self.strategy,
            task_count: tasks.unwrap_or(self.default_tasks),
            priority,
            pool_class: pool_class.unwrap_or_else(|| priority.default_pool_class()),
            compute: config.workload.compute_duration(),
            sleep: config.workload.sleep_duration(),
        }
    }
}

/// Everything the driver needs for one launch. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct ExperimentSpec {
    pub strategy: Strategy,
    pub task_count: usize,
    pub priority: TaskPriority,
    pub pool_class: PoolClass,
    pub compute: Duration,
    pub sleep: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_findable_by_name() {
        for entry in CATALOG {
            assert_eq!(find(entry.name).unwrap().name, entry.name);
        }
        assert!(find("no-such-experiment").is_none());
    }

    #[test]
    fn spec_applies_overrides_over_defaults() {
        let config = LabConfig::default();
        let entry = find("many-workers").unwrap();

        let spec = entry.spec(&config, Some(3), TaskPriority::High, None);
        assert_eq!(spec.task_count, 3);
        assert_eq!(spec.pool_class, PoolClass::UserInitiated);

        let spec = entry.spec(&config, None, TaskPriority::Default, Some(PoolClass::Background));
        assert_eq!(spec.task_count, entry.default_tasks);
        assert_eq!(spec.pool_class, PoolClass::Background);
    }

    #[test]
    fn priority_parses_and_maps_to_pool_class() {
        assert_eq!("low".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert_eq!(
            TaskPriority::Low.default_pool_class(),
            PoolClass::Background
        );
        assert!("urgent".parse::<TaskPriority>().is_err());
    }
}
