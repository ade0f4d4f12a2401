use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use uuid::Uuid;

fn bundle_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("exe-locator-core")
        .join("tests")
        .join("fixtures")
        .join("bundle")
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run(temp: &Path, os_name: &str, args: &[&str]) -> Output {
    let mut full = vec!["--resources".to_string(), bundle_root().display().to_string()];
    full.extend(args.iter().map(|a| a.to_string()));
    run_without_resources(temp, os_name, &full)
}

fn run_without_resources(temp: &Path, os_name: &str, args: &[impl AsRef<OsStr>]) -> Output {
    let exe = env!("CARGO_BIN_EXE_exe-locator");
    Command::new(exe)
        .arg("--temp-dir")
        .arg(temp)
        .arg("--os-name")
        .arg(os_name)
        .arg("--silent")
        .args(args)
        .output()
        .expect("run exe-locator")
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed: status={:?}, stdout={}, stderr={}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn e2e_extract_prints_executable_path() {
    let temp = unique_temp_dir("exe-locator-e2e");
    let _cleanup = CleanupDir(temp.clone());

    let out = run(&temp, "Windows 10", &["--version-tag", "5", "extract"]);
    assert_success(&out, "extract");

    let stdout = String::from_utf8_lossy(&out.stdout);
    let path = PathBuf::from(stdout.trim());
    assert_eq!(path, temp.join("exe-locator-5").join("mediatool.exe"));
    assert!(path.is_file(), "expected extracted file: {}", path.display());
    assert!(temp.join("exe-locator-5").join("mediatool-runtime.dll").is_file());
}

#[test]
fn e2e_extract_json_report() {
    let temp = unique_temp_dir("exe-locator-e2e-json");
    let _cleanup = CleanupDir(temp.clone());

    let out = run(&temp, "linux", &["extract", "--json"]);
    assert_success(&out, "extract --json");

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(report["platform"], "other");
    assert_eq!(report["files"].as_array().map(Vec::len), Some(2));
    let exe = report["executable_path"].as_str().expect("executable_path");
    assert!(exe.ends_with("mediatool"), "{exe}");
}

#[test]
fn e2e_config_file_overrides_defaults() {
    let temp = unique_temp_dir("exe-locator-e2e-config");
    let _cleanup = CleanupDir(temp.clone());
    let config = temp.join("locator.json");
    std::fs::write(
        &config,
        r#"{ "executable": "mediatool", "dir_prefix": "bundled", "version": 9 }"#,
    )
    .expect("write config");

    let out = run(
        &temp,
        "linux",
        &["--config", config.to_str().expect("utf-8 path"), "extract"],
    );
    assert_success(&out, "extract with config");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        PathBuf::from(stdout.trim()),
        temp.join("bundled-9").join("mediatool")
    );
}

#[test]
fn e2e_detect_lists_platform_files() {
    let temp = unique_temp_dir("exe-locator-e2e-detect");
    let _cleanup = CleanupDir(temp.clone());

    let out = run(&temp, "Mac OS X", &["detect"]);
    assert_success(&out, "detect");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("platform = macos"), "stdout: {stdout}");
    assert!(stdout.contains("files = mediatool;LICENSE.txt"), "stdout: {stdout}");
    assert!(
        !temp.join("exe-locator-1").exists(),
        "detect must not write files"
    );
}

#[test]
fn e2e_missing_manifest_fails() {
    let temp = unique_temp_dir("exe-locator-e2e-missing");
    let _cleanup = CleanupDir(temp.clone());

    let out = run(&temp, "linux", &["--manifest-name", "nope.properties", "extract"]);
    assert!(!out.status.success(), "extract should fail without manifest");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("nope.properties"), "stderr: {stderr}");
}

#[test]
fn e2e_doctor_reports_extracted_state() {
    let temp = unique_temp_dir("exe-locator-e2e-doctor");
    let _cleanup = CleanupDir(temp.clone());

    let before = run(&temp, "linux", &["doctor"]);
    assert_success(&before, "doctor");
    assert!(String::from_utf8_lossy(&before.stdout).contains("executable_exists = false"));

    assert_success(&run(&temp, "linux", &["extract"]), "extract");

    let after = run(&temp, "linux", &["doctor"]);
    assert_success(&after, "doctor");
    let stdout = String::from_utf8_lossy(&after.stdout);
    assert!(stdout.contains("executable_exists = true"), "stdout: {stdout}");
    if cfg!(unix) {
        assert!(stdout.contains("executable_runnable = true"), "stdout: {stdout}");
    }
}

#[test]
fn e2e_doctor_runs_without_resources() {
    let temp = unique_temp_dir("exe-locator-e2e-doctor-bare");
    let _cleanup = CleanupDir(temp.clone());

    let out = run_without_resources(&temp, "Windows 10", &["doctor"]);
    assert_success(&out, "doctor without --resources");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("platform = windows"), "stdout: {stdout}");
    assert!(stdout.contains("mediatool.exe"), "stdout: {stdout}");
}

#[test]
fn e2e_extract_requires_resources() {
    let temp = unique_temp_dir("exe-locator-e2e-extract-bare");
    let _cleanup = CleanupDir(temp.clone());

    for sub in ["extract", "detect"] {
        let out = run_without_resources(&temp, "linux", &[sub]);
        assert!(!out.status.success(), "{sub} should fail without --resources");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("--resources"), "stderr: {stderr}");
    }
    assert!(!temp.join("exe-locator-1").exists());
}

struct CleanupDir(PathBuf);

impl Drop for CleanupDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
