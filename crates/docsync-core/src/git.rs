//! Read-only git queries backing incremental change detection.
//!
//! All access goes through the `git` binary; nothing here mutates the
//! repository. Every query degrades to "information unavailable" rather than
//! failing the run when the repository cannot answer it.

use crate::error::{DocsyncError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

// ---------------------------------------------------------------------------
// Watermark
// ---------------------------------------------------------------------------

/// The most recent revision that touched the documentation set — the
/// baseline for incremental change detection.
#[derive(Debug, Clone, Serialize)]
pub struct Watermark {
    pub revision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<DateTime<Utc>>,
}

impl Watermark {
    /// Abbreviated revision for display.
    pub fn short(&self) -> &str {
        &self.revision[..self.revision.len().min(12)]
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn run_git(root: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| DocsyncError::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let hint: String = stderr.trim().chars().take(200).collect();
        return Err(DocsyncError::Git(format!(
            "git {} failed: {hint}",
            args.first().copied().unwrap_or("")
        )));
    }

    String::from_utf8(output.stdout).map_err(|_| DocsyncError::GitOutput)
}

/// Whether `root` sits inside a git work tree.
pub fn is_work_tree(root: &Path) -> bool {
    matches!(
        run_git(root, &["rev-parse", "--is-inside-work-tree"]),
        Ok(out) if out.trim() == "true"
    )
}

/// Find the most recent revision touching any file under `docs_dir`.
///
/// Returns `None` when the documentation set has never been committed (or
/// the repository has no history at all) — the caller falls back to full
/// regeneration in that case.
pub fn docs_watermark(root: &Path, docs_dir: &str) -> Option<Watermark> {
    let format = "--format=%H%x09%cI";
    let out = match run_git(root, &["log", "-1", format, "--", docs_dir]) {
        Ok(out) => out,
        Err(e) => {
            tracing::debug!("watermark lookup failed, treating as absent: {e}");
            return None;
        }
    };

    let line = out.lines().next()?.trim();
    if line.is_empty() {
        return None;
    }
    let (revision, date) = match line.split_once('\t') {
        Some((rev, date)) => (rev.to_string(), date),
        None => (line.to_string(), ""),
    };
    let committed_at = DateTime::parse_from_rfc3339(date)
        .ok()
        .map(DateTime::<Utc>::from);

    Some(Watermark {
        revision,
        committed_at,
    })
}

fn name_only(root: &Path, args: &[&str]) -> Result<Vec<String>> {
    let out = run_git(root, args)?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Paths changed by commits between `revision` and HEAD.
pub fn committed_since(root: &Path, revision: &str) -> Result<Vec<String>> {
    name_only(root, &["diff", "--name-only", &format!("{revision}..HEAD")])
}

/// Paths with staged (index) changes.
pub fn staged(root: &Path) -> Result<Vec<String>> {
    name_only(root, &["diff", "--name-only", "--cached"])
}

/// Paths with unstaged working-tree changes.
pub fn unstaged(root: &Path) -> Result<Vec<String>> {
    name_only(root, &["diff", "--name-only"])
}

/// The full change set since `revision`: committed ∪ staged ∪ unstaged.
/// Duplicates collapse; ordering is lexicographic and stable.
pub fn changed_set(root: &Path, revision: &str) -> Result<BTreeSet<String>> {
    let mut set = BTreeSet::new();
    set.extend(committed_since(root, revision)?);
    set.extend(staged(root)?);
    set.extend(unstaged(root)?);
    Ok(set)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {args:?} failed");
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "test@example.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    fn commit_all(dir: &Path, message: &str) {
        git(dir, &["add", "-A"]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    #[test]
    fn work_tree_detection() {
        let dir = TempDir::new().unwrap();
        assert!(!is_work_tree(dir.path()));
        init_repo(dir.path());
        assert!(is_work_tree(dir.path()));
    }

    #[test]
    fn watermark_absent_without_docs_history() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        // No commits at all
        assert!(docs_watermark(dir.path(), "docs").is_none());

        // Commits exist, but none touching docs/
        std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
        commit_all(dir.path(), "code only");
        assert!(docs_watermark(dir.path(), "docs").is_none());
    }

    #[test]
    fn watermark_found_after_docs_commit() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/architecture.md"), "# Arch").unwrap();
        commit_all(dir.path(), "add docs");

        let watermark = docs_watermark(dir.path(), "docs").unwrap();
        assert_eq!(watermark.revision.len(), 40);
        assert!(watermark.committed_at.is_some());
        assert_eq!(watermark.short().len(), 12);
    }

    #[test]
    fn changed_set_unions_committed_staged_and_unstaged() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/architecture.md"), "# Arch").unwrap();
        std::fs::write(dir.path().join("a.txt"), "one").unwrap();
        std::fs::write(dir.path().join("b.txt"), "one").unwrap();
        std::fs::write(dir.path().join("c.txt"), "one").unwrap();
        commit_all(dir.path(), "baseline");

        let watermark = docs_watermark(dir.path(), "docs").unwrap();

        // Committed change
        std::fs::write(dir.path().join("a.txt"), "two").unwrap();
        commit_all(dir.path(), "change a");
        // Staged change
        std::fs::write(dir.path().join("b.txt"), "two").unwrap();
        git(dir.path(), &["add", "b.txt"]);
        // Unstaged change
        std::fs::write(dir.path().join("c.txt"), "two").unwrap();

        let set = changed_set(dir.path(), &watermark.revision).unwrap();
        let paths: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn changed_set_empty_when_nothing_changed() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/architecture.md"), "# Arch").unwrap();
        commit_all(dir.path(), "baseline");

        let watermark = docs_watermark(dir.path(), "docs").unwrap();
        let set = changed_set(dir.path(), &watermark.revision).unwrap();
        assert!(set.is_empty());
    }
}
