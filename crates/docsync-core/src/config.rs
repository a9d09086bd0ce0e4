use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Optional per-project configuration, read from `.docsync.yaml` at the
/// project root. Every field has a default so the file never needs to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project name used in generated documents. Defaults to the root
    /// directory name at survey time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Directory holding the generated topic documents.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Top-level quick-reference file.
    #[serde(default = "default_quick_reference")]
    pub quick_reference: String,

    /// Project-index artifact written by the external indexer.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Package name of the external indexer tool, run through the best
    /// available JavaScript runtime.
    #[serde(default = "default_indexer_package")]
    pub indexer_package: String,
}

fn default_docs_dir() -> String {
    paths::DOCS_DIR.to_string()
}

fn default_quick_reference() -> String {
    paths::QUICK_REF_FILE.to_string()
}

fn default_index_file() -> String {
    paths::INDEX_FILE.to_string()
}

fn default_indexer_package() -> String {
    "project-index".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            docs_dir: default_docs_dir(),
            quick_reference: default_quick_reference(),
            index_file: default_index_file(),
            indexer_package: default_indexer_package(),
        }
    }
}

impl Config {
    /// Load `.docsync.yaml` from `root`, falling back to defaults when the
    /// file is absent.
    pub fn load(root: &Path) -> Result<Config> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_defaults_when_file_absent() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.docs_dir, "docs");
        assert_eq!(config.quick_reference, "QUICKREF.md");
        assert_eq!(config.index_file, "PROJECT_INDEX.json");
        assert_eq!(config.indexer_package, "project-index");
        assert!(config.project.is_none());
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".docsync.yaml"),
            "project: storefront\ndocs_dir: documentation\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project.as_deref(), Some("storefront"));
        assert_eq!(config.docs_dir, "documentation");
        assert_eq!(config.quick_reference, "QUICKREF.md");
    }

    #[test]
    fn load_malformed_file_errors() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".docsync.yaml"), "docs_dir: [not, a, string]").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
