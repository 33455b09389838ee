//! Test utilities for crossbuild-lib.
//!
//! [`FakeToolchain`] is a small shell script that behaves like `go` as far as
//! the orchestrator can tell: it lists targets from `targets.txt` and "builds"
//! by writing `os/arch` into the file named after `-o`. Targets listed in
//! `fail.txt` exit non-zero; targets in `skip.txt` exit zero without writing;
//! targets in `hang.txt` sleep long enough to outlive any test.
//!
//! The script is run through `/bin/sh` rather than executed directly so tests
//! never race on freshly written executables.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::toolchain::Toolchain;

const FAKE_GO: &str = r#"
here="$(dirname "$0")"

if [ "$1" = "tool" ]; then
  if [ -n "$GOOS" ] || [ -n "$GOARCH" ]; then
    echo "target override leaked into discovery" >&2
    exit 3
  fi
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
  echo "  cannot build $GOOS/$GOARCH  " >&2
  exit 2
fi

if [ -f "$here/hang.txt" ] && grep -qx "$GOOS/$GOARCH" "$here/hang.txt"; then
  exec sleep 30
fi

if [ -f "$here/skip.txt" ] && grep -qx "$GOOS/$GOARCH" "$here/skip.txt"; then
  exit 0
fi

printf '%s/%s\n' "$GOOS" "$GOARCH" > "$out"
"#;

/// A throwaway toolchain living in its own temporary directory.
pub struct FakeToolchain {
  pub dir: TempDir,
}

impl FakeToolchain {
  pub fn new(targets: &[&str]) -> Self {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fake-go.sh"), FAKE_GO).unwrap();
    fs::write(dir.path().join("targets.txt"), targets.join("\n")).unwrap();
    Self { dir }
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  /// Make builds for `target` (`os/arch`) exit non-zero.
  pub fn fail_on(&self, target: &str) {
    self.append("fail.txt", target);
  }

  /// Make builds for `target` succeed without producing a file.
  pub fn skip_output(&self, target: &str) {
    self.append("skip.txt", target);
  }

  /// Make builds for `target` block until killed.
  pub fn hang_on(&self, target: &str) {
    self.append("hang.txt", target);
  }

  /// Make the target listing fail.
  pub fn break_listing(&self) {
    fs::remove_file(self.dir.path().join("targets.txt")).unwrap();
  }

  /// Where an artifact named `name` should be written.
  pub fn out(&self, name: &str) -> PathBuf {
    self.dir.path().join("out").join(name)
  }

  pub fn toolchain(&self) -> Toolchain {
    let script = self.dir.path().join("fake-go.sh");
    Toolchain {
      program: "/bin/sh".to_string(),
      leading_args: vec![script.to_string_lossy().into_owned()],
      ..Toolchain::go()
    }
  }

  fn append(&self, file: &str, line: &str) {
    let mut f = fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(self.dir.path().join(file))
      .unwrap();
    writeln!(f, "{line}").unwrap();
  }
}
