//! Orchestration of one refresh run: pre-flight checks, index handling,
//! planning, document writes, and the final summary.

use crate::config::Config;
use crate::error::Result;
use crate::indexer::{self, IndexerOutcome};
use crate::io;
use crate::paths;
use crate::plan::{self, Mode, Preflight, SourceKind};
use crate::render;
use crate::summary::RefreshSummary;
use crate::survey;
use crate::topic::Topic;
use std::path::Path;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshOptions {
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Execute the documentation-refresh procedure at `root`.
///
/// Never hard-fails on a missing optional prerequisite: absence of the
/// index, the indexer runtime, git history, or the docs directory each
/// selects a defined fallback that the returned summary reports.
///
/// `consent` answers "create the project index?". It is resolved by the
/// caller (flag or interactive prompt) and only consulted when the index is
/// absent and a runtime for the indexer exists.
pub fn run(
    root: &Path,
    config: &Config,
    options: RefreshOptions,
    consent: &mut dyn FnMut() -> bool,
) -> Result<RefreshSummary> {
    let preflight = Preflight::check(root, config);
    tracing::debug!(?preflight, "pre-flight checks");

    let mut notes = Vec::new();
    let index_present = resolve_index(root, config, &preflight, consent, &mut notes);

    let strategy = plan::choose(index_present, preflight.docs_present);
    let mut plan = plan::build(root, config, strategy)?;
    notes.append(&mut plan.notes);

    let facts = survey::survey(root, config)?;
    let targets = plan.targets(&facts.evidence.supported_topics());

    let docs_dir = paths::docs_dir(root, &config.docs_dir);
    let existing: Vec<Topic> = Topic::all()
        .iter()
        .copied()
        .filter(|t| docs_dir.join(t.filename()).exists())
        .collect();
    let skipped: Vec<Topic> = existing
        .iter()
        .copied()
        .filter(|t| !targets.contains(t))
        .collect();

    // Quick reference follows the docs: every full regeneration rewrites its
    // managed section, an incremental run only when something else changed.
    let update_quick_ref = plan.mode == Mode::Full || !targets.is_empty();

    if !options.dry_run {
        write_documents(root, config, &plan.source, &facts, &targets)?;
        if update_quick_ref {
            let mut present: Vec<Topic> = existing.clone();
            present.extend(targets.iter().copied());
            present.sort_unstable();
            present.dedup();
            write_quick_ref(root, config, &facts, &present)?;
        }
    }

    Ok(RefreshSummary {
        mode: plan.mode,
        source: plan.source,
        watermark: plan.watermark,
        changed_paths: plan.changed_paths,
        unmatched: plan.unmatched,
        regenerated: targets,
        skipped,
        quick_ref_updated: update_quick_ref,
        notes,
        dry_run: options.dry_run,
    })
}

// ---------------------------------------------------------------------------
// Index handling
// ---------------------------------------------------------------------------

/// Returns whether the index is usable as a source of truth after this
/// step, pushing a note for every degradation or operator choice.
fn resolve_index(
    root: &Path,
    config: &Config,
    preflight: &Preflight,
    consent: &mut dyn FnMut() -> bool,
    notes: &mut Vec<String>,
) -> bool {
    if preflight.index_present {
        // Refresh an existing index only when docs exist too; with no docs
        // the index is already the blueprint for a fresh generation.
        if preflight.docs_present {
            match indexer::refresh_index(root, config) {
                IndexerOutcome::Completed => {
                    notes.push("project index refreshed".to_string());
                }
                IndexerOutcome::NoRuntime => notes.push(
                    "no JavaScript runtime to refresh the index; using the existing one"
                        .to_string(),
                ),
                IndexerOutcome::Failed(reason) => notes.push(format!(
                    "index refresh failed ({reason}); using the existing one"
                )),
            }
        }
        return true;
    }

    if indexer::detect_runtime().is_none() {
        notes.push(
            "no JavaScript runtime for the indexer; continuing with direct inspection"
                .to_string(),
        );
        return false;
    }

    if !consent() {
        notes.push("index creation skipped by operator choice".to_string());
        return false;
    }

    match indexer::refresh_index(root, config) {
        IndexerOutcome::Completed => {
            notes.push("project index created".to_string());
            true
        }
        IndexerOutcome::NoRuntime => {
            notes.push(
                "no JavaScript runtime for the indexer; continuing with direct inspection"
                    .to_string(),
            );
            false
        }
        IndexerOutcome::Failed(reason) => {
            notes.push(format!(
                "indexer failed ({reason}); continuing with direct inspection"
            ));
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

fn write_documents(
    root: &Path,
    config: &Config,
    source: &SourceKind,
    facts: &survey::ProjectFacts,
    targets: &[Topic],
) -> Result<()> {
    if targets.is_empty() {
        return Ok(());
    }
    let docs_dir = paths::docs_dir(root, &config.docs_dir);
    io::ensure_dir(&docs_dir)?;
    for topic in targets {
        let content = render::topic_document(*topic, facts, *source, config);
        let path = docs_dir.join(topic.filename());
        io::atomic_write(&path, content.as_bytes())?;
        tracing::info!(path = %path.display(), "wrote topic document");
    }
    Ok(())
}

fn write_quick_ref(
    root: &Path,
    config: &Config,
    facts: &survey::ProjectFacts,
    present: &[Topic],
) -> Result<()> {
    let path = paths::quick_ref_path(root, &config.quick_reference);
    let section = render::quick_ref_section(facts, config, present);

    let full_file = render::quick_ref_file(facts, config, present);
    if io::write_if_missing(&path, full_file.as_bytes())? {
        return Ok(());
    }

    let replaced = io::replace_between_markers(
        &path,
        paths::QUICK_REF_START,
        paths::QUICK_REF_END,
        &section,
    )?;
    if !replaced {
        // File exists but carries no managed region; append one, leaving
        // the operator's content untouched.
        let existing = std::fs::read_to_string(&path)?;
        let content = format!("{}\n\n{section}\n", existing.trim_end());
        io::atomic_write(&path, content.as_bytes())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    fn run_quiet(root: &Path, decline_index: bool) -> RefreshSummary {
        let mut consent = move || !decline_index;
        run(root, &Config::default(), RefreshOptions::default(), &mut consent).unwrap()
    }

    fn git(dir: &Path, args: &[&str]) {
        let out = Command::new("git").args(args).current_dir(dir).output().unwrap();
        assert!(out.status.success(), "git {args:?} failed");
    }

    fn init_repo(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "t@example.com"]);
        git(dir, &["config", "user.name", "T"]);
    }

    fn commit_all(dir: &Path, message: &str) {
        git(dir, &["add", "-A"]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn fresh_project_gets_unconditional_docs_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/format.ts", "export {}");
        let summary = run_quiet(dir.path(), true);

        assert_eq!(summary.mode, Mode::Full);
        assert_eq!(summary.source, SourceKind::DirectInspection);
        assert!(dir.path().join("docs/architecture.md").exists());
        assert!(dir.path().join("docs/development.md").exists());
        assert!(!dir.path().join("docs/authentication.md").exists());
        assert!(!dir.path().join("docs/database.md").exists());
        assert!(dir.path().join("QUICKREF.md").exists());
        assert!(summary.quick_ref_updated);
        assert!(summary
            .notes
            .iter()
            .any(|n| n.contains("not under version control")
                || n.contains("skipped by operator choice")
                || n.contains("no JavaScript runtime")));
    }

    #[test]
    fn evidence_adds_conditional_docs_on_full_run() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/auth.ts", "");
        write(dir.path(), "db/migrations/001.sql", "");
        let summary = run_quiet(dir.path(), true);

        assert!(summary.regenerated.contains(&Topic::Authentication));
        assert!(summary.regenerated.contains(&Topic::Database));
        assert!(dir.path().join("docs/authentication.md").exists());
        assert!(dir.path().join("docs/database.md").exists());
    }

    #[test]
    fn full_runs_are_idempotent() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/auth.ts", "");
        run_quiet(dir.path(), true);
        let first = std::fs::read_to_string(dir.path().join("docs/authentication.md")).unwrap();
        let quick_first = std::fs::read_to_string(dir.path().join("QUICKREF.md")).unwrap();

        run_quiet(dir.path(), true);
        let second = std::fs::read_to_string(dir.path().join("docs/authentication.md")).unwrap();
        let quick_second = std::fs::read_to_string(dir.path().join("QUICKREF.md")).unwrap();
        assert_eq!(first, second);
        assert_eq!(quick_first, quick_second);
    }

    #[test]
    fn incremental_rewrites_only_affected_topics() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        write(dir.path(), "src/lib/auth.ts", "a");
        write(dir.path(), "src/routes/users.ts", "r");
        run_quiet(dir.path(), true);
        commit_all(dir.path(), "generate docs");

        // Scribble into two generated docs so preservation is observable
        let api_doc = dir.path().join("docs/api.md");
        std::fs::write(&api_doc, "hand-edited api doc").unwrap();
        let arch_doc = dir.path().join("docs/architecture.md");
        std::fs::write(&arch_doc, "hand-edited architecture").unwrap();
        commit_all(dir.path(), "hand edits");

        write(dir.path(), "src/lib/auth.ts", "b");
        let summary = run_quiet(dir.path(), true);

        assert_eq!(summary.mode, Mode::Incremental);
        assert_eq!(summary.regenerated, vec![Topic::Authentication]);
        // Untouched topics keep their bytes, hand edits included
        assert_eq!(
            std::fs::read_to_string(&api_doc).unwrap(),
            "hand-edited api doc"
        );
        assert_eq!(
            std::fs::read_to_string(&arch_doc).unwrap(),
            "hand-edited architecture"
        );
        assert!(summary.skipped.contains(&Topic::Api));
        assert!(summary.skipped.contains(&Topic::Architecture));
    }

    #[test]
    fn incremental_with_no_changes_writes_nothing() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        write(dir.path(), "src/lib/auth.ts", "a");
        run_quiet(dir.path(), true);
        commit_all(dir.path(), "generate docs");

        let quick_ref = dir.path().join("QUICKREF.md");
        let before = std::fs::metadata(&quick_ref).unwrap().modified().unwrap();

        let summary = run_quiet(dir.path(), true);
        assert_eq!(summary.mode, Mode::Incremental);
        assert!(summary.changed_paths.is_empty());
        assert!(summary.regenerated.is_empty());
        assert!(!summary.quick_ref_updated);
        let after = std::fs::metadata(&quick_ref).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn unmapped_change_reports_no_impact() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        write(dir.path(), "src/main.rs", "fn main() {}");
        run_quiet(dir.path(), true);
        commit_all(dir.path(), "generate docs");

        write(dir.path(), "NOTES.txt", "scratch");
        git(dir.path(), &["add", "NOTES.txt"]);

        let summary = run_quiet(dir.path(), true);
        assert_eq!(summary.mode, Mode::Incremental);
        assert_eq!(summary.changed_paths, vec!["NOTES.txt"]);
        assert_eq!(summary.unmatched, vec!["NOTES.txt"]);
        assert!(summary.regenerated.is_empty());
    }

    #[test]
    fn operator_decline_is_reported_in_notes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {}");
        let summary = run_quiet(dir.path(), true);
        // With a JS runtime on PATH the decline note appears; without one
        // the degradation note appears instead. Either way the index step
        // is accounted for.
        assert!(summary
            .notes
            .iter()
            .any(|n| n.contains("skipped by operator choice")
                || n.contains("no JavaScript runtime")));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/auth.ts", "");
        let mut consent = || false;
        let summary = run(
            dir.path(),
            &Config::default(),
            RefreshOptions { dry_run: true },
            &mut consent,
        )
        .unwrap();
        assert!(summary.dry_run);
        assert!(!summary.regenerated.is_empty());
        assert!(!dir.path().join("docs").exists());
        assert!(!dir.path().join("QUICKREF.md").exists());
    }

    #[test]
    fn quick_ref_hand_content_survives_refresh() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {}");
        run_quiet(dir.path(), true);

        // Operator adds content outside the managed region
        let quick_ref = dir.path().join("QUICKREF.md");
        let mut content = std::fs::read_to_string(&quick_ref).unwrap();
        content.push_str("\n## Team conventions\n\nAlways rebase.\n");
        std::fs::write(&quick_ref, &content).unwrap();

        run_quiet(dir.path(), true);
        let after = std::fs::read_to_string(&quick_ref).unwrap();
        assert!(after.contains("## Team conventions"));
        assert!(after.contains("Always rebase."));
        assert_eq!(after.matches(paths::QUICK_REF_START).count(), 1);
    }
}
