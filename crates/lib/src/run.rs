//! End-to-end orchestration.
//!
//! discover → dispatch → build on the worker pool → aggregate.
//!
//! Configuration and discovery problems abort before any job starts. Job
//! failures either end up in the report or abort the run, depending on the
//! [`RunMode`]. Whatever happens, the pool is shut down before returning so no
//! toolchain process outlives the run.

use thiserror::Error;
use tracing::info;

use crate::build::pool::{PoolSettings, WorkerPool};
use crate::catalog::{DiscoveryError, discover};
use crate::config::{ConfigError, RunConfig};
use crate::dispatch::{DispatchRequest, DispatchWarning};
use crate::report::{AggregateError, Report, collect};

/// Errors that end a run without a report.
#[derive(Debug, Error)]
pub enum RunError {
  #[error("invalid configuration")]
  Config(#[from] ConfigError),

  #[error("target discovery failed")]
  Discovery(#[from] DiscoveryError),

  #[error(transparent)]
  Aggregate(#[from] AggregateError),
}

/// What a completed run produced.
#[derive(Debug, Default)]
pub struct RunOutcome {
  pub report: Report,
  /// Requested targets that were not built.
  pub warnings: Vec<DispatchWarning>,
}

/// Build every requested target.
pub async fn run(config: &RunConfig) -> Result<RunOutcome, RunError> {
  if config.workers == 0 {
    return Err(ConfigError::NoWorkers.into());
  }

  let request = DispatchRequest::new(&config.os, &config.arch, &config.args, &config.toolchain.output_flag)?;

  let catalog = discover(&config.toolchain).await?;
  let plan = request.plan(&catalog);
  let expected = plan.jobs.len();

  if expected == 0 {
    info!("nothing to build");
    return Ok(RunOutcome {
      report: Report::default(),
      warnings: plan.warnings,
    });
  }

  let mut pool = WorkerPool::spawn(PoolSettings {
    workers: config.workers.min(expected),
    toolchain: config.toolchain.clone(),
    template: config.template.clone(),
  });

  info!(jobs = expected, workers = pool.workers(), mode = ?config.mode, "dispatching builds");
  pool.dispatch(plan.jobs);

  let collected = collect(pool.results(), expected, config.mode).await;
  pool.shutdown().await;

  Ok(RunOutcome {
    report: collected?,
    warnings: plan.warnings,
  })
}
