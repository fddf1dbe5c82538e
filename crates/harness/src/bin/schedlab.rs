//! schedlab — command-line driver for the scheduling testbed.
//!
//! Selects an experiment from the catalog, launches it fire-and-forget,
//! waits a wall-clock window for the log lines to land, and prints a
//! blank separator line. The log stream on stdout is the only output;
//! nothing is returned or persisted.
//!
//! The tokio runtime is built by hand with an explicit worker-thread
//! count so the saturation experiments reproduce the same way on every
//! host.

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use schedlab_core::{threads, LabConfig};
use schedlab_harness::{catalog, Driver, PoolClass, TaskPriority};

// ── CLI ─────────────────────────────────────────────────────────────

/// Concurrency scheduling testbed: makes execution-strategy differences
/// observable through an identity-tagged log stream.
#[derive(Parser, Debug)]
#[command(name = "schedlab", version, about)]
struct Cli {
    /// Path to schedlab.toml config file.
    #[arg(long, env = "SCHEDLAB_CONFIG", default_value = "schedlab.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the experiment catalog.
    List,
    /// Run one experiment and wait for its output.
    Run {
        /// Catalog name of the experiment (see `schedlab list`).
        experiment: String,

        /// Number of logical tasks (default: the catalog entry's).
        #[arg(long)]
        tasks: Option<usize>,

        /// Task priority hint: low, default, or high.
        #[arg(long, default_value = "default")]
        priority: TaskPriority,

        /// Offload pool class; defaults to the priority's mapping.
        #[arg(long)]
        pool_class: Option<PoolClass>,

        /// Seconds to wait for log output before exiting.
        #[arg(long, env = "SCHEDLAB_WAIT_SECS", default_value_t = 8.0)]
        wait_secs: f64,
    },
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Claim thread number 1 before anything logs.
    threads::register_main();

    let cli = Cli::parse();

    let config = match LabConfig::from_file(&cli.config) {
        Ok(cfg) => {
            info!(path = %cli.config, "loaded config");
            cfg
        }
        Err(e) => {
            warn!(error = %e, path = %cli.config, "failed to load config, using defaults");
            LabConfig::default()
        }
    };

    match cli.command {
        Command::List => {
            for entry in catalog::CATALOG {
                let mut tags = Vec::new();
                if entry.suspends {
                    tags.push("suspends");
                }
                if entry.uses_pool {
                    tags.push("pool");
                }
                println!(
                    "{:<18} tasks={:<3} [{}] {}",
                    entry.name,
                    entry.default_tasks,
                    tags.join(","),
                    entry.summary
                );
            }
            Ok(())
        }
        Command::Run {
            experiment,
            tasks,
            priority,
            pool_class,
            wait_secs,
        } => {
            let Some(entry) = catalog::find(&experiment) else {
                bail!("unknown experiment {experiment:?}; see `schedlab list`");
            };
            let spec = entry.spec(&config, tasks, priority, pool_class);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(config.scheduler.resolved_worker_threads())
                .thread_name("schedlab-worker")
                .enable_all()
                .build()?;

            runtime.block_on(async move {
                let driver = Driver::new(&config)?;
                let _handle = driver.launch(&spec);
                tokio::time::sleep(std::time::Duration::from_secs_f64(wait_secs)).await;
                Ok::<_, anyhow::Error>(())
            })?;

            // Trailing separator so back-to-back runs stay readable.
            println!();
            Ok(())
        }
    }
}
