//! The per-job procedure run by each worker.
//!
//! 1. Render the output filename and rewrite the job's output argument
//! 2. Create the output's parent directory if the filename has one
//! 3. Invoke the toolchain's build subcommand for the job's target
//! 4. Classify a non-zero exit as a compile failure
//! 5. Stat and hash the artifact
//!
//! Every job yields exactly one [`BuildResult`], whichever step fails.

use std::path::Path;

use tracing::{debug, error, info};

use crate::build::template::OutputTemplate;
use crate::build::types::{BuildJob, BuildResult, JobError};
use crate::toolchain::Toolchain;
use crate::util::hash::{ContentHash, hash_file};

struct Artifact {
  size: u64,
  hash: ContentHash,
}

/// Run one job to completion.
pub async fn run_job(mut job: BuildJob, toolchain: &Toolchain, template: &OutputTemplate) -> BuildResult {
  let filename = job.apply_output_template(template, toolchain.wants_exe_suffix(&job.os));

  match build(&job, toolchain, &filename).await {
    Ok(artifact) => {
      info!(
        os = %job.os,
        arch = %job.arch,
        file = %filename,
        size = artifact.size,
        hash = %artifact.hash,
        "finished compiling {}",
        filename
      );
      BuildResult::success(&job, filename, artifact.size, artifact.hash)
    }
    Err(err) => {
      error!(os = %job.os, arch = %job.arch, error = %err, "compilation failed");
      BuildResult::failure(&job, filename, err)
    }
  }
}

async fn build(job: &BuildJob, toolchain: &Toolchain, filename: &str) -> Result<Artifact, JobError> {
  prepare_output_dir(filename).await?;
  compile(job, toolchain, filename).await?;
  verify(filename).await
}

/// Create the parent directory of `filename` if it names one.
///
/// `create_dir_all` treats an existing directory as success, including one
/// created concurrently by another worker.
async fn prepare_output_dir(filename: &str) -> Result<(), JobError> {
  if !filename.contains('/') && !filename.contains(std::path::MAIN_SEPARATOR) {
    return Ok(());
  }

  let Some(parent) = Path::new(filename).parent().filter(|p| !p.as_os_str().is_empty()) else {
    return Ok(());
  };

  tokio::fs::create_dir_all(parent)
    .await
    .map_err(|source| JobError::Directory {
      path: parent.to_path_buf(),
      source,
    })
}

async fn compile(job: &BuildJob, toolchain: &Toolchain, filename: &str) -> Result<(), JobError> {
  debug!(
    toolchain = %toolchain.display_name(),
    os = %job.os,
    arch = %job.arch,
    args = ?job.args(),
    "running compiler"
  );

  let output = toolchain
    .build_command(&job.os, &job.arch, job.args())
    .output()
    .await
    .map_err(|source| JobError::Compile {
      filename: filename.to_string(),
      output: String::new(),
      reason: source.to_string(),
    })?;

  let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
  combined.push_str(&String::from_utf8_lossy(&output.stderr));
  let combined = combined.trim();

  if !output.status.success() {
    return Err(JobError::Compile {
      filename: filename.to_string(),
      output: combined.to_string(),
      reason: output.status.to_string(),
    });
  }

  if !combined.is_empty() {
    debug!(os = %job.os, arch = %job.arch, output = %combined, "compiler output");
  }

  Ok(())
}

async fn verify(filename: &str) -> Result<Artifact, JobError> {
  let metadata = tokio::fs::metadata(filename)
    .await
    .map_err(|source| JobError::Missing {
      filename: filename.to_string(),
      source,
    })?;

  let hash = hash_file(Path::new(filename))
    .await
    .map_err(|source| JobError::Unreadable {
      filename: filename.to_string(),
      source,
    })?;

  Ok(Artifact {
    size: metadata.len(),
    hash,
  })
}
