//! Test fixture loader for perturb graph specs.
//!
//! Fixtures live in the workspace-level `test-fixtures/` directory and are
//! YAML graph specs grouped by subdirectory.

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Subdirectory whose presence identifies the workspace fixture root.
const MARKER: &str = "dags";

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Walk up from whichever crate is running the tests.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join(MARKER).is_dir() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/{} from CARGO_MANIFEST_DIR={}",
                MARKER, manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Read a fixture file as a string.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_fixture_str(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load and deserialize a YAML fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture_str(relative_path);
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", relative_path, e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all YAML files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    paths.sort();
    paths
}
