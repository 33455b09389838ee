//! Result aggregation and the final report.
//!
//! The aggregator waits for exactly one result per dispatched job. Arrival
//! order is whatever order workers finish in; the report keeps it.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::build::BuildResult;
use crate::config::RunMode;

/// Ways result collection can end early.
#[derive(Debug, Error)]
pub enum AggregateError {
  /// A job failed while running in strict mode.
  #[error("compilation failed for {}: {}", .0.target(), .0.failure_message())]
  JobFailed(Box<BuildResult>),

  /// The result queue closed before every job reported back.
  #[error("expected {expected} results but the workers stopped after {received}")]
  ResultsLost { expected: usize, received: usize },
}

/// Every collected result, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
  results: Vec<BuildResult>,
}

impl Report {
  pub fn results(&self) -> &[BuildResult] {
    &self.results
  }

  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  pub fn successes(&self) -> impl Iterator<Item = &BuildResult> {
    self.results.iter().filter(|r| r.is_success())
  }

  pub fn failures(&self) -> impl Iterator<Item = &BuildResult> {
    self.results.iter().filter(|r| !r.is_success())
  }

  pub fn is_success(&self) -> bool {
    self.failures().next().is_none()
  }

  /// Total size of all successfully built artifacts.
  pub fn total_size(&self) -> u64 {
    self.successes().map(|r| r.size).sum()
  }

  /// Write the report as tab-indented JSON.
  pub fn write_json<W: std::io::Write>(&self, writer: W) -> serde_json::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    self.serialize(&mut serializer)
  }

  pub fn to_json(&self) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    self.write_json(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
  }
}

/// Collect `expected` results from the queue.
///
/// In strict mode the first failure ends collection immediately with
/// [`AggregateError::JobFailed`]; results still in flight are not awaited.
/// In lenient mode failures are kept in the report alongside successes.
pub async fn collect(
  results: &mut mpsc::Receiver<BuildResult>,
  expected: usize,
  mode: RunMode,
) -> Result<Report, AggregateError> {
  let mut report = Report {
    results: Vec::with_capacity(expected),
  };

  while report.results.len() < expected {
    let Some(result) = results.recv().await else {
      error!(expected, received = report.results.len(), "result queue closed early");
      return Err(AggregateError::ResultsLost {
        expected,
        received: report.results.len(),
      });
    };

    if !result.is_success() && mode == RunMode::Strict {
      return Err(AggregateError::JobFailed(Box::new(result)));
    }

    debug!(
      target_pair = %result.target(),
      received = report.results.len() + 1,
      expected,
      "collected result"
    );
    report.results.push(result);
  }

  Ok(report)
}
