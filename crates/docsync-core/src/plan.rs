//! Strategy selection and refresh planning.
//!
//! The strategy comes from a 2×2 decision table over artifact presence;
//! everything after that is fallback handling (no repository, no watermark)
//! and change-set evaluation. Planning is read-only — execution lives in
//! `refresh`.

use crate::config::Config;
use crate::error::Result;
use crate::git::{self, Watermark};
use crate::mapping::TopicMapper;
use crate::paths;
use crate::topic::Topic;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Mode / SourceKind
// ---------------------------------------------------------------------------

/// How much of the documentation set gets recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Recompute every topic from source, ignoring prior content.
    Full,
    /// Recompute only topics implicated by detected changes.
    Incremental,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => f.write_str("full"),
            Mode::Incremental => f.write_str("incremental"),
        }
    }
}

/// Where the regeneration reads its picture of the project from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The externally-generated project index is present and current.
    Index,
    /// Direct inspection of manifests and directory layout.
    DirectInspection,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Index => f.write_str("project index"),
            SourceKind::DirectInspection => f.write_str("direct inspection"),
        }
    }
}

// ---------------------------------------------------------------------------
// Preflight
// ---------------------------------------------------------------------------

/// Existence checks that drive strategy selection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preflight {
    pub index_present: bool,
    pub docs_present: bool,
    pub quick_ref_present: bool,
    pub in_work_tree: bool,
}

impl Preflight {
    pub fn check(root: &Path, config: &Config) -> Preflight {
        Preflight {
            index_present: paths::index_path(root, &config.index_file).exists(),
            docs_present: paths::docs_dir(root, &config.docs_dir).is_dir(),
            quick_ref_present: paths::quick_ref_path(root, &config.quick_reference).exists(),
            in_work_tree: git::is_work_tree(root),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// One row of the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub mode: Mode,
    pub source: SourceKind,
}

/// Select the strategy from artifact presence:
///
/// | index | docs | strategy |
/// |---|---|---|
/// | yes | yes | incremental, index as source of truth |
/// | yes | no  | full, index as blueprint |
/// | no  | yes | incremental via direct inspection |
/// | no  | no  | full via direct inspection |
pub fn choose(index_present: bool, docs_present: bool) -> Strategy {
    Strategy {
        mode: if docs_present {
            Mode::Incremental
        } else {
            Mode::Full
        },
        source: if index_present {
            SourceKind::Index
        } else {
            SourceKind::DirectInspection
        },
    }
}

// ---------------------------------------------------------------------------
// RefreshPlan
// ---------------------------------------------------------------------------

/// The resolved plan for one run: effective mode and source after fallbacks,
/// plus the evaluated change set when running incrementally.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshPlan {
    pub mode: Mode,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
    /// Changed paths considered, deduplicated and sorted.
    pub changed_paths: Vec<String>,
    /// Topics implicated by the changed paths (incremental mode only).
    pub affected: BTreeSet<Topic>,
    /// Changed paths that matched no mapping pattern — analyzed, no doc
    /// impact.
    pub unmatched: Vec<String>,
    /// Fallbacks and degradations taken while planning.
    pub notes: Vec<String>,
}

impl RefreshPlan {
    /// Topics this run will (re)generate.
    pub fn targets(&self, evidence_supported: &[Topic]) -> Vec<Topic> {
        match self.mode {
            Mode::Full => {
                let mut targets: Vec<Topic> = Topic::unconditional().to_vec();
                targets.extend(evidence_supported.iter().copied());
                targets.sort_unstable();
                targets.dedup();
                targets
            }
            Mode::Incremental => self.affected.iter().copied().collect(),
        }
    }
}

/// Resolve `strategy` against the repository state.
///
/// Incremental mode requires a work tree and a documentation watermark;
/// missing either falls back to full regeneration with a note. A watermark
/// with an empty change set stays incremental and plans zero writes.
pub fn build(root: &Path, config: &Config, strategy: Strategy) -> Result<RefreshPlan> {
    let mut plan = RefreshPlan {
        mode: strategy.mode,
        source: strategy.source,
        watermark: None,
        changed_paths: Vec::new(),
        affected: BTreeSet::new(),
        unmatched: Vec::new(),
        notes: Vec::new(),
    };

    if plan.mode == Mode::Full {
        return Ok(plan);
    }

    if !git::is_work_tree(root) {
        plan.mode = Mode::Full;
        plan.notes
            .push("not under version control; falling back to full regeneration".to_string());
        return Ok(plan);
    }

    let Some(watermark) = git::docs_watermark(root, &config.docs_dir) else {
        plan.mode = Mode::Full;
        plan.notes.push(
            "documentation has no commit history; falling back to full regeneration".to_string(),
        );
        return Ok(plan);
    };

    let changed = git::changed_set(root, &watermark.revision)?;
    tracing::debug!(
        watermark = watermark.short(),
        changed = changed.len(),
        "incremental change detection"
    );

    // Changes to the tool's own outputs (docs directory, quick reference,
    // project index) are results of previous runs, not input signals.
    let docs_prefix = format!("{}/", config.docs_dir);
    let changed_paths: Vec<String> = changed
        .into_iter()
        .filter(|p| {
            !p.starts_with(&docs_prefix) && p != &config.quick_reference && p != &config.index_file
        })
        .collect();

    let mapper = TopicMapper::default();
    let outcome = mapper.evaluate(changed_paths.iter().map(String::as_str));

    plan.watermark = Some(watermark);
    plan.changed_paths = changed_paths;
    plan.affected = outcome.affected;
    plan.unmatched = outcome.unmatched;
    Ok(plan)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
