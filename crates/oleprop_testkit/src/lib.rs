//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Resolve a per-test scratch file under `<target>/oleprop-scratch`, creating the directory.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("oleprop-scratch");
	std::fs::create_dir_all(&dir).expect("scratch directory is creatable");
	dir.join(format!("{}-{name}", std::process::id()))
}

/// Parse captured stdout as one JSON document.
pub fn json_from_stdout(stdout: &[u8]) -> serde_json::Value {
	serde_json::from_slice(stdout).expect("stdout should be valid json")
}
