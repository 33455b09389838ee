//! Target catalog discovered from the toolchain.
//!
//! The toolchain prints one `os/arch` pair per line. The catalog groups the
//! architectures under their operating system, preserving discovery order.
//! It is built once and never modified; job validation depends on it being
//! complete, so any discovery problem is fatal.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::toolchain::Toolchain;

/// Errors raised while discovering the toolchain's supported targets.
#[derive(Debug, Error)]
pub enum DiscoveryError {
  /// The toolchain could not be started.
  #[error("failed to run `{command}`: {error}")]
  Spawn { command: String, error: std::io::Error },

  /// The toolchain ran but reported failure.
  #[error("`{command}` exited with {status}: {output}")]
  Failed {
    command: String,
    status: std::process::ExitStatus,
    output: String,
  },

  /// A line of the listing was not an `os/arch` pair.
  #[error("unparsable target line {line_number}: {line:?}")]
  Parse { line_number: usize, line: String },

  /// The listing contained no targets at all.
  #[error("toolchain reported no supported targets")]
  Empty,
}

/// One operating system and the architectures the toolchain supports for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
  os: String,
  architectures: Vec<String>,
}

impl TargetEntry {
  pub fn os(&self) -> &str {
    &self.os
  }

  /// Supported architectures, in discovery order.
  pub fn architectures(&self) -> &[String] {
    &self.architectures
  }

  pub fn has_architecture(&self, arch: &str) -> bool {
    self.architectures.iter().any(|a| a == arch)
  }
}

/// The complete set of targets supported by a toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetCatalog {
  entries: Vec<TargetEntry>,
}

impl TargetCatalog {
  /// Parse a target listing (newline-separated `os/arch` pairs).
  ///
  /// Blank lines are ignored and repeated pairs collapse into one.
  pub fn parse(listing: &str) -> Result<Self, DiscoveryError> {
    let mut catalog = Self::default();

    for (index, raw) in listing.lines().enumerate() {
      let line = raw.trim();
      if line.is_empty() {
        continue;
      }

      let (os, arch) = parse_target_line(line).ok_or_else(|| DiscoveryError::Parse {
        line_number: index + 1,
        line: raw.to_string(),
      })?;

      debug!(os, arch, "adding target");
      catalog.insert(os, arch);
    }

    if catalog.entries.is_empty() {
      return Err(DiscoveryError::Empty);
    }

    Ok(catalog)
  }

  fn insert(&mut self, os: &str, arch: &str) {
    match self.entries.iter_mut().find(|e| e.os == os) {
      Some(entry) => {
        if !entry.has_architecture(arch) {
          entry.architectures.push(arch.to_string());
        }
      }
      None => self.entries.push(TargetEntry {
        os: os.to_string(),
        architectures: vec![arch.to_string()],
      }),
    }
  }

  /// Find the entry for an operating system (exact, case-sensitive match).
  pub fn find_os(&self, os: &str) -> Option<&TargetEntry> {
    self.entries.iter().find(|e| e.os == os)
  }

  pub fn entries(&self) -> &[TargetEntry] {
    &self.entries
  }

  /// Total number of (os, arch) pairs.
  pub fn target_count(&self) -> usize {
    self.entries.iter().map(|e| e.architectures.len()).sum()
  }
}

fn parse_target_line(line: &str) -> Option<(&str, &str)> {
  let (os, arch) = line.split_once('/')?;
  if os.is_empty() || arch.is_empty() || arch.contains('/') {
    return None;
  }
  Some((os, arch))
}

/// Ask the toolchain for its supported targets.
pub async fn discover(toolchain: &Toolchain) -> Result<TargetCatalog, DiscoveryError> {
  let command_line = format!("{} {}", toolchain.display_name(), toolchain.list_args.join(" "));
  debug!(command = %command_line, "listing toolchain targets");

  let output = toolchain
    .list_command()
    .output()
    .await
    .map_err(|error| DiscoveryError::Spawn {
      command: command_line.clone(),
      error,
    })?;

  if !output.status.success() {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim().to_string();

    error!(command = %command_line, output = %combined, "target listing failed");

    return Err(DiscoveryError::Failed {
      command: command_line,
      status: output.status,
      output: combined,
    });
  }

  let catalog = TargetCatalog::parse(&String::from_utf8_lossy(&output.stdout))?;

  info!(
    systems = catalog.entries().len(),
    targets = catalog.target_count(),
    "discovered toolchain targets"
  );

  Ok(catalog)
}
