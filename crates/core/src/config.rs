//! Testbed configuration.
//!
//! Parsed from `schedlab.toml`. Every knob has a default so the binary
//! runs without any file present; the defaults keep the scheduler small
//! enough that the saturation experiments reproduce on any host.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LabError;

/// Full configuration for a testbed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabConfig {
    /// Logical-task scheduler sizing.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Per-QoS-class offload pool sizing.
    #[serde(default)]
    pub pools: PoolsConfig,

    /// Simulated workload durations.
    #[serde(default)]
    pub workload: WorkloadConfig,
}

impl LabConfig {
    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LabError> {
        let raw = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "parsed lab config");
        Ok(config)
    }
}

/// Sizing of the tokio runtime that executes logical tasks.
///
/// The count is deliberately explicit and small by default: the
/// saturation experiments depend on a bounded scheduler, and relying on
/// the host's core count would make them environment-dependent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of runtime worker threads. 0 = available parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

fn default_worker_threads() -> usize {
    4
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
        }
    }
}

impl SchedulerConfig {
    /// Resolve the worker thread count (0 means available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }
}

/// Thread counts for the four QoS offload pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsConfig {
    #[serde(default = "default_background")]
    pub background: usize,
    #[serde(default = "default_utility")]
    pub utility: usize,
    #[serde(default = "default_user_initiated")]
    pub user_initiated: usize,
    #[serde(default = "default_user_interactive")]
    pub user_interactive: usize,
}

fn default_background() -> usize {
    2
}
fn default_utility() -> usize {
    2
}
fn default_user_initiated() -> usize {
    4
}
fn default_user_interactive() -> usize {
    4
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            utility: default_utility(),
            user_initiated: default_user_initiated(),
            user_interactive: default_user_interactive(),
        }
    }
}

/// Default durations for the simulated workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Busy-compute duration in seconds.
    #[serde(default = "default_compute_seconds")]
    pub compute_seconds: f64,

    /// Cooperative-sleep duration in seconds.
    #[serde(default = "default_sleep_seconds")]
    pub sleep_seconds: f64,
}

fn default_compute_seconds() -> f64 {
    2.0
}
fn default_sleep_seconds() -> f64 {
    1.0
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            compute_seconds: default_compute_seconds(),
            sleep_seconds: default_sleep_seconds(),
        }
    }
}

impl WorkloadConfig {
    pub fn compute_duration(&self) -> Duration {
        Duration::from_secs_f64(self.compute_seconds)
    }

    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs_f64(self.sleep_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = LabConfig::default();
        assert_eq!(cfg.scheduler.worker_threads, 4);
        assert_eq!(cfg.pools.background, 2);
        assert!((cfg.workload.compute_seconds - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: LabConfig = toml::from_str(
            r#"
            [scheduler]
            worker_threads = 2

            [workload]
            compute_seconds = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scheduler.worker_threads, 2);
        assert_eq!(cfg.pools.utility, 2);
        assert_eq!(cfg.workload.compute_duration(), Duration::from_millis(500));
        assert_eq!(cfg.workload.sleep_duration(), Duration::from_secs(1));
    }

    #[test]
    fn zero_worker_threads_resolves_to_parallelism() {
        let cfg = SchedulerConfig { worker_threads: 0 };
        assert!(cfg.resolved_worker_threads() >= 1);
    }
}
