//! The run summary reported to the operator after every refresh.

use crate::git::Watermark;
use crate::plan::{Mode, SourceKind};
use crate::topic::Topic;
use serde::Serialize;
use std::fmt::Write as _;

/// Everything a run did (or, on a dry run, would have done).
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub mode: Mode,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Watermark>,
    /// Changed paths considered by incremental change detection.
    pub changed_paths: Vec<String>,
    /// Subset of `changed_paths` that matched no mapping pattern.
    pub unmatched: Vec<String>,
    /// Topic documents written this run.
    pub regenerated: Vec<Topic>,
    /// Existing topic documents left untouched.
    pub skipped: Vec<Topic>,
    pub quick_ref_updated: bool,
    /// Fallbacks, degradations, and operator choices taken along the way.
    pub notes: Vec<String>,
    pub dry_run: bool,
}

impl RefreshSummary {
    pub fn render_text(&self, docs_dir: &str, quick_reference: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Mode: {} (source: {})", self.mode, self.source);

        if let Some(watermark) = &self.watermark {
            match watermark.committed_at {
                Some(at) => {
                    let _ = writeln!(
                        out,
                        "Watermark: {} ({})",
                        watermark.short(),
                        at.format("%Y-%m-%d")
                    );
                }
                None => {
                    let _ = writeln!(out, "Watermark: {}", watermark.short());
                }
            }
        }

        if self.mode == Mode::Incremental {
            if self.changed_paths.is_empty() {
                let _ = writeln!(out, "No changes since the watermark.");
            } else {
                let _ = writeln!(out, "Changed paths ({}):", self.changed_paths.len());
                for path in &self.changed_paths {
                    if self.unmatched.contains(path) {
                        let _ = writeln!(out, "  {path} (analyzed, no doc impact)");
                    } else {
                        let _ = writeln!(out, "  {path}");
                    }
                }
            }
        }

        if self.regenerated.is_empty() {
            let _ = writeln!(out, "Regenerated: none");
        } else {
            let _ = writeln!(out, "Regenerated ({}):", self.regenerated.len());
            for topic in &self.regenerated {
                let _ = writeln!(out, "  {docs_dir}/{}", topic.filename());
            }
        }

        if !self.skipped.is_empty() {
            let _ = writeln!(
                out,
                "Skipped: {} file(s) left untouched",
                self.skipped.len()
            );
        }

        let _ = writeln!(
            out,
            "Quick reference: {}",
            if self.quick_ref_updated {
                format!("{quick_reference} updated")
            } else {
                "not updated".to_string()
            }
        );

        for note in &self.notes {
            let _ = writeln!(out, "Note: {note}");
        }

        if self.dry_run {
            let _ = writeln!(out, "Dry run: nothing was written.");
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
