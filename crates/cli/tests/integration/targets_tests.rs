//! Tests for `crossbuild targets`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn lists_targets_as_text() {
  let env = TestEnv::new(&["linux/amd64", "linux/arm64", "windows/amd64"]);

  env
    .cmd()
    .arg("targets")
    .assert()
    .success()
    .stdout(predicate::str::contains("linux    amd64, arm64"))
    .stdout(predicate::str::contains("windows  amd64"));
}

#[test]
fn lists_targets_as_json() {
  let env = TestEnv::new(&["linux/amd64", "windows/amd64"]);

  let output = env.cmd().args(["targets", "--format", "json"]).output().unwrap();

  assert!(output.status.success());
  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value[0]["os"], "linux");
  assert_eq!(value[0]["architectures"][0], "amd64");
  assert_eq!(value[1]["os"], "windows");
}

#[test]
fn malformed_listing_fails() {
  let env = TestEnv::new(&["linux/amd64", "garbage"]);

  env
    .cmd()
    .arg("targets")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unparsable target line 2"));
}
