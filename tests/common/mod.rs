#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tree2dir::validate::{Platform, ValidationConfig};

/// The tree used throughout the README.
pub const SCENARIO_A: &str = "
project/
├── src/
│   ├── index.js
│   └── utils.js
└── package.json
";

/// Validation rules that do not depend on the host running the tests.
pub fn unix_config() -> ValidationConfig {
    ValidationConfig::for_platform(Platform::Unix)
}

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Write `text` to `tree.txt` inside `dir` and return its path.
pub fn write_tree_file(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("tree.txt");
    fs::write(&path, text).unwrap();
    path
}
