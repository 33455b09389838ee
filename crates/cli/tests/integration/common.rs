//! Shared test helpers for CLI integration tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A `go` stand-in: lists `targets.txt`, writes `os/arch` to the `-o` path,
/// exits non-zero for targets listed in `fail.txt`.
const FAKE_GO: &str = r#"
here="$(dirname "$0")"

if [ "$1" = "tool" ]; then
  cat "$here/targets.txt"
  exit $?
fi

shift
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    out="$2"
    shift
  fi
  shift
done

if [ -f "$here/fail.txt" ] && grep -qx "$GOOS/$GOARCH" "$here/fail.txt"; then
  echo "cannot build $GOOS/$GOARCH" >&2
  exit 2
fi

printf '%s/%s\n' "$GOOS" "$GOARCH" > "$out"
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the fake toolchain and
/// every artifact it produces.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new(targets: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("fake-go.sh"), FAKE_GO).unwrap();
    fs::write(temp.path().join("targets.txt"), targets.join("\n")).unwrap();
    Self { temp }
  }

  /// Make builds for `target` (`os/arch`) fail.
  pub fn fail_on(&self, target: &str) {
    let mut f = fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(self.temp.path().join("fail.txt"))
      .unwrap();
    writeln!(f, "{target}").unwrap();
  }

  /// Path under the temp directory, as a string for toolchain arguments.
  pub fn out(&self, relative: &str) -> String {
    self.out_path(relative).to_string_lossy().into_owned()
  }

  pub fn out_path(&self, relative: &str) -> PathBuf {
    self.temp.path().join(relative)
  }

  /// Toolchain command line running the fake through `/bin/sh`.
  pub fn toolchain(&self) -> String {
    format!("/bin/sh {}", self.temp.path().join("fake-go.sh").display())
  }

  /// A crossbuild command wired to the fake toolchain, with no inherited
  /// configuration from the test process.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("crossbuild");
    for var in [
      "GOOS",
      "GOARCH",
      "GOBINARY",
      "CROSSBUILD_JOBS",
      "CROSSBUILD_KEEP_GOING",
      "RUST_LOG",
    ] {
      cmd.env_remove(var);
    }
    cmd.env("CROSSBUILD_TOOLCHAIN", self.toolchain());
    cmd
  }
}

/// Parse the JSON report printed on stdout.
pub fn parse_report(stdout: &[u8]) -> Vec<serde_json::Value> {
  serde_json::from_slice(stdout).unwrap_or_else(|e| panic!("report is not JSON ({e}): {}", String::from_utf8_lossy(stdout)))
}

/// Sorted basenames of every `filename` in the report.
pub fn basenames(report: &[serde_json::Value]) -> Vec<String> {
  let mut names: Vec<String> = report
    .iter()
    .map(|r| {
      let filename = r["filename"].as_str().unwrap();
      Path::new(filename).file_name().unwrap().to_string_lossy().into_owned()
    })
    .collect();
  names.sort();
  names
}
