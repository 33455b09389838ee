//! Build jobs, their results, and per-job errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::template::OutputTemplate;
use crate::util::hash::ContentHash;

/// One (os, arch) compilation, consumed by exactly one worker.
///
/// Each job owns its argument list. Workers rewrite the output argument in
/// place, so jobs must never share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
  pub os: String,
  pub arch: String,
  args: Vec<String>,
  /// Index of the argument following the output flag.
  output_index: usize,
}

impl BuildJob {
  /// Create a job. `output_index` must point at an existing argument; the
  /// dispatcher guarantees this by validating the argument template once.
  pub(crate) fn new(os: &str, arch: &str, args: Vec<String>, output_index: usize) -> Self {
    debug_assert!(output_index < args.len());
    Self {
      os: os.to_string(),
      arch: arch.to_string(),
      args,
      output_index,
    }
  }

  pub fn args(&self) -> &[String] {
    &self.args
  }

  /// Render the output filename and write it back into the arguments so the
  /// toolchain itself writes to the final path.
  pub fn apply_output_template(&mut self, template: &OutputTemplate, exe_suffix: bool) -> String {
    let name = &self.args[self.output_index];
    let filename = template.filename(name, &self.os, &self.arch, exe_suffix);
    self.args[self.output_index] = filename.clone();
    filename
  }
}

/// Which step of the per-job procedure failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
  Directory,
  Compile,
  Verification,
}

/// Serializable description of a failed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFailure {
  pub kind: FailureKind,
  pub message: String,
}

impl std::fmt::Display for BuildFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)
  }
}

/// Errors that fail a single job. They never cross job boundaries; each is
/// folded into that job's [`BuildResult`].
#[derive(Debug, Error)]
pub enum JobError {
  #[error("failed to create output directory {}: {source}", path.display())]
  Directory {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to compile {filename}: {output}: {reason}")]
  Compile {
    filename: String,
    output: String,
    reason: String,
  },

  #[error("output file {filename} missing despite apparent success: {source}")]
  Missing {
    filename: String,
    #[source]
    source: std::io::Error,
  },

  #[error("unable to hash output {filename}: {source}")]
  Unreadable {
    filename: String,
    #[source]
    source: std::io::Error,
  },
}

impl JobError {
  pub fn kind(&self) -> FailureKind {
    match self {
      JobError::Directory { .. } => FailureKind::Directory,
      JobError::Compile { .. } => FailureKind::Compile,
      JobError::Missing { .. } | JobError::Unreadable { .. } => FailureKind::Verification,
    }
  }
}

impl From<JobError> for BuildFailure {
  fn from(err: JobError) -> Self {
    Self {
      kind: err.kind(),
      message: err.to_string(),
    }
  }
}

/// Outcome of one job, as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
  pub os: String,
  pub arch: String,
  pub filename: String,
  /// Artifact size in bytes; 0 when the job failed.
  pub size: u64,
  /// Content hash; absent when the job failed.
  pub hash: Option<ContentHash>,
  /// Present iff the job did not produce a verified artifact.
  pub error: Option<BuildFailure>,
}

impl BuildResult {
  pub fn success(job: &BuildJob, filename: String, size: u64, hash: ContentHash) -> Self {
    Self {
      os: job.os.clone(),
      arch: job.arch.clone(),
      filename,
      size,
      hash: Some(hash),
      error: None,
    }
  }

  pub fn failure(job: &BuildJob, filename: String, err: JobError) -> Self {
    Self {
      os: job.os.clone(),
      arch: job.arch.clone(),
      filename,
      size: 0,
      hash: None,
      error: Some(err.into()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.error.is_none()
  }

  /// The failure message, or an empty string for a successful result.
  pub fn failure_message(&self) -> &str {
    self.error.as_ref().map(|e| e.message.as_str()).unwrap_or_default()
  }

  /// `os/arch` label for logs and summaries.
  pub fn target(&self) -> String {
    format!("{}/{}", self.os, self.arch)
  }
}
