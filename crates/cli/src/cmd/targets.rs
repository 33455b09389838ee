//! Implementation of the `crossbuild targets` command.

use anyhow::{Context, Result};

use crossbuild_lib::catalog::discover;
use crossbuild_lib::toolchain::Toolchain;

use crate::output::{OutputFormat, print_json};

/// Print every (os, arch) pair the toolchain can build.
pub fn cmd_targets(toolchain: Toolchain, format: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let catalog = rt
    .block_on(discover(&toolchain))
    .context("Failed to list toolchain targets")?;

  if format.is_json() {
    return print_json(&catalog);
  }

  let width = catalog.entries().iter().map(|e| e.os().len()).max().unwrap_or(0);
  for entry in catalog.entries() {
    println!("{:<width$}  {}", entry.os(), entry.architectures().join(", "), width = width);
  }

  Ok(())
}
