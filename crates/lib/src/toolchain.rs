//! Description of the external compiler toolchain.
//!
//! The orchestrator never compiles anything itself. Everything it needs to know
//! about the toolchain (how to list targets, how to build, which environment
//! variables select the target) lives in [`Toolchain`]. The default describes
//! the Go toolchain.

use std::ffi::OsStr;
use std::process::Stdio;

use tokio::process::Command;

/// How to drive an external toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Program to execute, resolved through `PATH`.
  pub program: String,
  /// Arguments inserted before every subcommand (e.g. a script path when the
  /// program is an interpreter).
  pub leading_args: Vec<String>,
  /// Arguments that make the toolchain print its `os/arch` target list.
  pub list_args: Vec<String>,
  /// Subcommand that compiles a program.
  pub build_subcommand: String,
  /// Environment variable selecting the target operating system.
  pub os_env: String,
  /// Environment variable selecting the target architecture.
  pub arch_env: String,
  /// Operating system whose artifacts get the `.exe` suffix.
  pub exe_suffix_os: String,
  /// Flag whose following argument names the output file.
  pub output_flag: String,
}

impl Toolchain {
  /// The Go toolchain: `go tool dist list`, `go build`, `GOOS`/`GOARCH`.
  pub fn go() -> Self {
    Self {
      program: "go".to_string(),
      leading_args: Vec::new(),
      list_args: vec!["tool".to_string(), "dist".to_string(), "list".to_string()],
      build_subcommand: "build".to_string(),
      os_env: "GOOS".to_string(),
      arch_env: "GOARCH".to_string(),
      exe_suffix_os: "windows".to_string(),
      output_flag: "-o".to_string(),
    }
  }

  /// Go conventions with a different launcher.
  ///
  /// The command line is split on whitespace, like `CC`-style variables, so
  /// `"sh ./fake-go.sh"` runs `sh` with `./fake-go.sh` ahead of every
  /// subcommand. Returns `None` for a blank command line.
  pub fn from_command_line(line: &str) -> Option<Self> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next()?;

    Some(Self {
      program,
      leading_args: parts.collect(),
      ..Self::go()
    })
  }

  /// Human-readable command line, for logs and error messages.
  pub fn display_name(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.leading_args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Whether artifacts for `os` get the executable suffix.
  pub fn wants_exe_suffix(&self, os: &str) -> bool {
    os == self.exe_suffix_os
  }

  fn base_command(&self) -> Command {
    let mut command = Command::new(&self.program);
    command
      .args(&self.leading_args)
      .stdin(Stdio::null())
      .kill_on_drop(true);
    command
  }

  /// Command listing supported targets.
  ///
  /// The target override variables are stripped so the listing reflects the
  /// toolchain's native capability rather than whatever the caller exported.
  pub fn list_command(&self) -> Command {
    let mut command = self.base_command();
    command
      .args(&self.list_args)
      .env_remove(&self.os_env)
      .env_remove(&self.arch_env);
    command
  }

  /// Command building one target with the given arguments.
  pub fn build_command<I, S>(&self, os: &str, arch: &str, args: I) -> Command
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let mut command = self.base_command();
    command
      .arg(&self.build_subcommand)
      .args(args)
      .env(&self.os_env, os)
      .env(&self.arch_env, arch);
    command
  }
}

impl Default for Toolchain {
  fn default() -> Self {
    Self::go()
  }
}
