use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Artifact constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = ".docsync.yaml";
pub const DOCS_DIR: &str = "docs";
pub const QUICK_REF_FILE: &str = "QUICKREF.md";
pub const INDEX_FILE: &str = "PROJECT_INDEX.json";

/// Markers delimiting the managed region of the quick-reference file.
/// Content outside the markers belongs to the operator.
pub const QUICK_REF_START: &str = "<!-- docsync:start -->";
pub const QUICK_REF_END: &str = "<!-- docsync:end -->";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn docs_dir(root: &Path, dir: &str) -> PathBuf {
    root.join(dir)
}

pub fn topic_path(root: &Path, dir: &str, filename: &str) -> PathBuf {
    root.join(dir).join(filename)
}

pub fn quick_ref_path(root: &Path, filename: &str) -> PathBuf {
    root.join(filename)
}

pub fn index_path(root: &Path, filename: &str) -> PathBuf {
    root.join(filename)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
