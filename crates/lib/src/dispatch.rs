//! Expansion of a build request into concrete jobs.
//!
//! Every requested OS is looked up in the [`TargetCatalog`]. Unknown systems
//! are skipped with a warning; architectures the OS does not support are
//! skipped quietly. Only pairs present in the catalog ever become jobs.

use serde::Serialize;
use tracing::{debug, warn};

use crate::build::BuildJob;
use crate::build::template::output_value_index;
use crate::catalog::TargetCatalog;
use crate::config::ConfigError;

/// A requested target that was left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchWarning {
  /// The toolchain does not know this operating system.
  UnknownOs { os: String },
  /// The operating system exists but lacks the requested architecture.
  UnsupportedArch { os: String, arch: String },
}

impl std::fmt::Display for DispatchWarning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DispatchWarning::UnknownOs { os } => write!(f, "OS does not exist: {}", os),
      DispatchWarning::UnsupportedArch { os, arch } => write!(f, "{} does not support {}", os, arch),
    }
  }
}

/// A validated request, ready to be planned against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
  os: Vec<String>,
  arch: Vec<String>,
  args: Vec<String>,
  output_index: usize,
}

impl DispatchRequest {
  /// Validate and normalise a request.
  ///
  /// Entries are trimmed, blanks dropped and duplicates collapsed (first
  /// occurrence wins). Fails if no OS remains or the arguments do not name
  /// an output file after `output_flag`.
  pub fn new(os: &[String], arch: &[String], args: &[String], output_flag: &str) -> Result<Self, ConfigError> {
    let os = normalize(os);
    if os.is_empty() {
      return Err(ConfigError::NoTargetOs);
    }

    let output_index = output_value_index(args, output_flag).ok_or_else(|| ConfigError::MissingOutputFlag {
      flag: output_flag.to_string(),
    })?;

    Ok(Self {
      os,
      arch: normalize(arch),
      args: args.to_vec(),
      output_index,
    })
  }

  /// Expand into jobs, in request order.
  ///
  /// OS and architecture names were deduplicated in [`DispatchRequest::new`],
  /// so no two jobs ever share a target or its output filename.
  pub fn plan(&self, catalog: &TargetCatalog) -> DispatchPlan {
    let mut plan = DispatchPlan::default();

    for os in &self.os {
      let Some(entry) = catalog.find_os(os) else {
        warn!(os = %os, "OS does not exist");
        plan.warnings.push(DispatchWarning::UnknownOs { os: os.clone() });
        continue;
      };

      let candidates = if self.arch.is_empty() {
        entry.architectures()
      } else {
        &self.arch[..]
      };

      for arch in candidates {
        if !entry.has_architecture(arch) {
          debug!(os = %os, arch = %arch, "architecture not supported, skipping");
          plan.warnings.push(DispatchWarning::UnsupportedArch {
            os: os.clone(),
            arch: arch.clone(),
          });
          continue;
        }

        plan
          .jobs
          .push(BuildJob::new(os, arch, self.args.clone(), self.output_index));
      }
    }

    plan
  }
}

/// Jobs to run plus everything that was left out.
#[derive(Debug, Default)]
pub struct DispatchPlan {
  pub jobs: Vec<BuildJob>,
  pub warnings: Vec<DispatchWarning>,
}

fn normalize(values: &[String]) -> Vec<String> {
  let mut out: Vec<String> = Vec::with_capacity(values.len());
  for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
    if !out.iter().any(|o| o == value) {
      out.push(value.to_string());
    }
  }
  out
}
