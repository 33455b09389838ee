mod cmd;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crossbuild_lib::toolchain::Toolchain;

use crate::cmd::BuildArgs;
use crate::output::OutputFormat;

/// crossbuild - build a program for many OS/architecture pairs in parallel
#[derive(Parser)]
#[command(name = "crossbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Toolchain command line, split on whitespace (e.g. "go")
  #[arg(long, global = true, env = "CROSSBUILD_TOOLCHAIN", default_value = "go")]
  toolchain: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every requested target and print a JSON report
  Build(BuildArgs),

  /// List the targets the toolchain supports
  Targets {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // Logs go to stderr; stdout carries only the report.
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = Toolchain::from_command_line(&cli.toolchain)
    .context("Toolchain command line is empty")
    .and_then(|toolchain| match cli.command {
      Commands::Build(args) => cmd::cmd_build(args, toolchain, cli.verbose),
      Commands::Targets { format } => cmd::cmd_targets(toolchain, format),
    });

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
