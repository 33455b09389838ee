//! Run configuration.
//!
//! Everything a run needs is carried in an immutable [`RunConfig`] value that
//! is passed explicitly to the dispatcher and the worker pool. Nothing is read
//! from ambient process state once the run starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::template::OutputTemplate;
use crate::toolchain::Toolchain;

/// Fatal configuration problems, detected before any job is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("expected one or more target operating systems")]
  NoTargetOs,

  #[error("toolchain arguments must name an output file with `{flag} <name>`")]
  MissingOutputFlag { flag: String },

  #[error("worker count must be at least 1")]
  NoWorkers,
}

/// What to do when a single job fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
  /// The first failed job aborts the run; no report is produced.
  #[default]
  Strict,
  /// Keep collecting; failures are reported per job.
  Lenient,
}

/// Complete configuration for one orchestration run.
#[derive(Debug, Clone)]
pub struct RunConfig {
  /// Toolchain to drive.
  pub toolchain: Toolchain,
  /// Requested operating systems, in dispatch order.
  pub os: Vec<String>,
  /// Requested architectures; empty means every architecture of each OS.
  pub arch: Vec<String>,
  /// Arguments passed to every build, after the build subcommand.
  pub args: Vec<String>,
  /// Template for output filenames.
  pub template: OutputTemplate,
  /// Number of concurrent workers.
  pub workers: usize,
  pub mode: RunMode,
}

impl Default for RunConfig {
  fn default() -> Self {
    Self {
      toolchain: Toolchain::default(),
      os: Vec::new(),
      arch: Vec::new(),
      args: Vec::new(),
      template: OutputTemplate::default(),
      workers: default_workers(),
      mode: RunMode::default(),
    }
  }
}

/// Default worker count: the number of available processing units.
pub fn default_workers() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
