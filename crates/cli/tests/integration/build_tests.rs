//! Tests for `crossbuild build`.

use predicates::prelude::*;

use crate::common::{TestEnv, basenames, parse_report};

const MATRIX: &[&str] = &["linux/amd64", "linux/arm64", "windows/amd64", "darwin/arm64"];

#[test]
fn builds_requested_systems_from_env() {
  let env = TestEnv::new(MATRIX);

  let output = env
    .cmd()
    .args(["build", "--", "-o", &env.out("app"), "."])
    .env("GOOS", "linux,windows")
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  let report = parse_report(&output.stdout);
  assert_eq!(report.len(), 3);
  assert_eq!(
    basenames(&report),
    ["app_linux_amd64", "app_linux_arm64", "app_windows_amd64.exe"]
  );

  for entry in &report {
    assert_eq!(entry["hash"].as_str().unwrap().len(), 64);
    assert!(entry["size"].as_u64().unwrap() > 0);
    assert!(entry["error"].is_null());
  }
  assert!(env.out_path("app_windows_amd64.exe").is_file());
}

#[test]
fn report_is_tab_indented() {
  let env = TestEnv::new(MATRIX);

  env
    .cmd()
    .args(["build", "--os", "darwin", "--", "-o", &env.out("app")])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("[\n\t{\n\t\t\"os\": \"darwin\""));
}

#[test]
fn arch_filter_restricts_targets() {
  let env = TestEnv::new(MATRIX);

  let output = env
    .cmd()
    .args(["build", "--os", "linux,windows", "--arch", "arm64", "--", "-o", &env.out("app")])
    .output()
    .unwrap();

  assert!(output.status.success());
  let report = parse_report(&output.stdout);
  assert_eq!(basenames(&report), ["app_linux_arm64"]);
}

#[test]
fn custom_template_creates_directories() {
  let env = TestEnv::new(MATRIX);

  let output = env
    .cmd()
    .args(["build", "--os", "linux", "-j", "2", "--", "-o", &env.out("dist")])
    .env("GOBINARY", "{name}/{os}/{arch}/tool")
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  assert!(env.out_path("dist/linux/amd64/tool").is_file());
  assert!(env.out_path("dist/linux/arm64/tool").is_file());
}

#[test]
fn unknown_os_prints_warning_and_empty_report() {
  let env = TestEnv::new(MATRIX);

  env
    .cmd()
    .args(["build", "--os", "plan9", "--keep-going", "--", "-o", &env.out("app")])
    .assert()
    .success()
    .stdout(predicate::str::diff("[]\n"))
    .stderr(predicate::str::contains("OS does not exist: plan9"));
}

#[test]
fn strict_mode_fails_without_report() {
  let env = TestEnv::new(MATRIX);
  env.fail_on("linux/arm64");

  env
    .cmd()
    .args(["build", "--os", "linux", "--", "-o", &env.out("app")])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("compilation failed for linux/arm64"))
    .stderr(predicate::str::contains("cannot build linux/arm64"));
}

#[test]
fn keep_going_reports_failures() {
  let env = TestEnv::new(MATRIX);
  env.fail_on("linux/arm64");

  let output = env
    .cmd()
    .args(["build", "--os", "linux,windows", "-k", "--", "-o", &env.out("app")])
    .output()
    .unwrap();

  assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
  let report = parse_report(&output.stdout);
  assert_eq!(report.len(), 3);

  let failed: Vec<_> = report.iter().filter(|r| !r["error"].is_null()).collect();
  assert_eq!(failed.len(), 1);
  assert_eq!(failed[0]["arch"], "arm64");
  assert_eq!(failed[0]["size"], 0);
  assert!(failed[0]["hash"].is_null());
  assert_eq!(failed[0]["error"]["kind"], "compile");
  assert!(String::from_utf8_lossy(&output.stderr).contains("Built 2 of 3 target(s)"));
}

#[test]
fn keep_going_from_env() {
  let env = TestEnv::new(MATRIX);
  env.fail_on("darwin/arm64");

  env
    .cmd()
    .args(["build", "--os", "darwin", "--", "-o", &env.out("app")])
    .env("CROSSBUILD_KEEP_GOING", "true")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"kind\": \"compile\""));
}
