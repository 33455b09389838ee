//! Implementation of the `crossbuild build` command.
//!
//! Builds every requested target and writes the JSON report to stdout. In the
//! default strict mode the first failed target aborts the run with a non-zero
//! exit and no report; with `--keep-going` every result is reported.

use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use crossbuild_lib::build::template::OutputTemplate;
use crossbuild_lib::config::{RunConfig, RunMode, default_workers, split_list};
use crossbuild_lib::consts::DEFAULT_OUTPUT_TEMPLATE;
use crossbuild_lib::dispatch::DispatchWarning;
use crossbuild_lib::run;
use crossbuild_lib::toolchain::Toolchain;

use crate::output::{format_bytes, format_duration, print_info, print_success, print_warning, truncate_hash};

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Target operating systems, comma separated (e.g. linux,windows)
  #[arg(long, env = "GOOS")]
  pub os: Option<String>,

  /// Target architectures, comma separated; all supported when omitted
  #[arg(long, env = "GOARCH", default_value = "")]
  pub arch: String,

  /// Output filename template ({name}, {os}, {arch})
  #[arg(long, env = "GOBINARY", default_value = DEFAULT_OUTPUT_TEMPLATE)]
  pub template: String,

  /// Number of concurrent builds (default: available CPUs)
  #[arg(short, long, env = "CROSSBUILD_JOBS")]
  pub jobs: Option<usize>,

  /// Report failed targets instead of aborting on the first one
  #[arg(short, long, env = "CROSSBUILD_KEEP_GOING")]
  pub keep_going: bool,

  /// Arguments for the toolchain's build subcommand; must include `-o <name>`
  #[arg(last = true)]
  pub args: Vec<String>,
}

impl BuildArgs {
  fn into_config(self, toolchain: Toolchain) -> RunConfig {
    RunConfig {
      toolchain,
      os: split_list(self.os.as_deref().unwrap_or_default()),
      arch: split_list(&self.arch),
      args: self.args,
      template: OutputTemplate::new(self.template),
      workers: self.jobs.unwrap_or_else(default_workers),
      mode: if self.keep_going { RunMode::Lenient } else { RunMode::Strict },
    }
  }
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs, toolchain: Toolchain, verbose: bool) -> Result<()> {
  let config = args.into_config(toolchain);
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt.block_on(run(&config))?;

  for warning in &outcome.warnings {
    match warning {
      DispatchWarning::UnknownOs { .. } => print_warning(&warning.to_string()),
      DispatchWarning::UnsupportedArch { .. } if verbose => print_info(&format!("skipped: {}", warning)),
      DispatchWarning::UnsupportedArch { .. } => {}
    }
  }

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  outcome.report.write_json(&mut out).context("Failed to write report")?;
  writeln!(out).context("Failed to write report")?;
  out.flush().context("Failed to write report")?;

  let report = &outcome.report;
  if verbose {
    for result in report.successes() {
      print_info(&format!(
        "{} {} ({}, {})",
        result.target(),
        result.filename,
        format_bytes(result.size),
        result.hash.as_ref().map(|h| truncate_hash(&h.0)).unwrap_or_default()
      ));
    }
  }

  for result in report.failures() {
    print_warning(&format!("{}: {}", result.target(), result.failure_message()));
  }

  let built = report.successes().count();
  let summary = format!(
    "Built {} of {} target(s), {} in {}",
    built,
    report.len(),
    format_bytes(report.total_size()),
    format_duration(started.elapsed())
  );
  if report.is_success() {
    print_success(&summary);
  } else {
    print_warning(&summary);
  }

  Ok(())
}
