use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use oleprop_testkit::{json_from_stdout, target_dir as workspace_target_dir};

static OLEPROP_BIN: OnceLock<PathBuf> = OnceLock::new();

fn run_oleprop(args: &[&str]) -> Output {
	Command::new(oleprop_bin()).args(args).output().expect("oleprop command executes")
}

pub(crate) fn run_oleprop_text(args: &[&str]) -> String {
	let output = run_oleprop(args);
	assert_success(&output);
	String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

pub(crate) fn run_oleprop_json(args: &[&str]) -> serde_json::Value {
	let output = run_oleprop(args);
	assert_success(&output);
	json_from_stdout(&output.stdout)
}

/// Run a command that must fail and return its stderr.
pub(crate) fn run_oleprop_failure(args: &[&str]) -> String {
	let output = run_oleprop(args);
	assert!(!output.status.success(), "oleprop {args:?} unexpectedly succeeded");
	assert_eq!(output.status.code(), Some(1), "errors exit with status 1");
	assert!(output.stdout.is_empty(), "failed command wrote to stdout");
	String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
	assert!(
		output.status.success(),
		"oleprop command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
}

fn oleprop_bin() -> &'static PathBuf {
	OLEPROP_BIN.get_or_init(resolve_oleprop_bin)
}

fn resolve_oleprop_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_oleprop") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "oleprop.exe" } else { "oleprop" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "oleprop"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build oleprop binary at {}", bin.display());

	bin
}
