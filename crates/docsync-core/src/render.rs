//! Deterministic document rendering.
//!
//! Generated content is a pure function of the survey facts — no
//! timestamps, no environment — so a rerun over an unchanged tree produces
//! byte-identical output.

use crate::config::Config;
use crate::paths;
use crate::plan::SourceKind;
use crate::survey::ProjectFacts;
use crate::topic::Topic;
use std::fmt::Write as _;

const GENERATED_HEADER: &str = "<!-- generated by docsync -->";

// ---------------------------------------------------------------------------
// Topic documents
// ---------------------------------------------------------------------------

/// Render the full content of one topic document.
pub fn topic_document(
    topic: Topic,
    facts: &ProjectFacts,
    source: SourceKind,
    config: &Config,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{GENERATED_HEADER}\n");
    let _ = writeln!(out, "# {}\n", topic.title());

    match topic {
        Topic::Architecture => architecture_body(&mut out, facts, source, config),
        Topic::Development => development_body(&mut out, facts),
        _ => conditional_body(&mut out, topic, facts),
    }

    let _ = writeln!(
        out,
        "\n---\n\nSource of truth: {source}. Regenerate with `docsync refresh`."
    );
    out
}

fn architecture_body(out: &mut String, facts: &ProjectFacts, source: SourceKind, config: &Config) {
    let _ = writeln!(
        out,
        "High-level map of `{}`, derived from {source}.\n",
        facts.name
    );

    if !facts.top_level_dirs.is_empty() {
        let _ = writeln!(out, "## Layout\n");
        for dir in &facts.top_level_dirs {
            let _ = writeln!(out, "- `{dir}/`");
        }
        let _ = writeln!(out);
    }

    if !facts.manifests.is_empty() {
        let _ = writeln!(out, "## Manifests\n");
        for manifest in &facts.manifests {
            let _ = writeln!(out, "- `{manifest}`");
        }
        let _ = writeln!(out);
    }

    if source == SourceKind::Index {
        let _ = writeln!(
            out,
            "## Project index\n\nA machine-readable module map lives in `{}`.",
            config.index_file
        );
    }
}

fn development_body(out: &mut String, facts: &ProjectFacts) {
    let _ = writeln!(out, "Getting `{}` running locally.\n", facts.name);
    let _ = writeln!(out, "## Setup\n");

    let has = |name: &str| {
        facts
            .manifests
            .iter()
            .any(|m| m == name || m.ends_with(&format!("/{name}")))
    };

    let mut any = false;
    if has("package.json") {
        let _ = writeln!(out, "- `npm install` — install JavaScript dependencies");
        let _ = writeln!(out, "- `npm test` — run the test suite");
        any = true;
    }
    if has("Cargo.toml") {
        let _ = writeln!(out, "- `cargo build` — build the Rust workspace");
        let _ = writeln!(out, "- `cargo test` — run the test suite");
        any = true;
    }
    if has("pyproject.toml") {
        let _ = writeln!(out, "- `pip install -e .` — install in editable mode");
        any = true;
    }
    if has("go.mod") {
        let _ = writeln!(out, "- `go build ./...` — build all packages");
        any = true;
    }
    if has("docker-compose.yml") || has("docker-compose.yaml") {
        let _ = writeln!(out, "- `docker compose up -d` — start local services");
        any = true;
    }
    if !any {
        let _ = writeln!(out, "- no recognized build manifest; see the repository README");
    }
}

fn conditional_body(out: &mut String, topic: Topic, facts: &ProjectFacts) {
    let intro = match topic {
        Topic::Database => "Schema, migrations, and data-access layers found in the tree.",
        Topic::Api => "Request-handling surface: routes, controllers, and middleware.",
        Topic::Authentication => "How identity is established and carried through the system.",
        Topic::Permissions => "Authorization: roles and access rules enforced in the code.",
        Topic::Testing => "Test layout and the tooling the suite runs on.",
        Topic::Architecture | Topic::Development => unreachable!("handled above"),
    };
    let _ = writeln!(out, "{intro}\n");

    let signals = facts.evidence.signals(topic);
    if signals.is_empty() {
        let _ = writeln!(
            out,
            "No supporting evidence was detected on the last scan; recent changes implicated this topic."
        );
    } else {
        let _ = writeln!(out, "## Detected signals\n");
        for signal in signals {
            let _ = writeln!(out, "- `{signal}`");
        }
    }
}

// ---------------------------------------------------------------------------
// Quick reference
// ---------------------------------------------------------------------------

/// Render the managed region of the quick-reference file, markers included.
/// `topics` is the set of topic documents that exist after the run.
pub fn quick_ref_section(facts: &ProjectFacts, config: &Config, topics: &[Topic]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", paths::QUICK_REF_START);
    let _ = writeln!(out, "\n## Project documentation\n");
    let _ = writeln!(
        out,
        "Generated for `{}` by `docsync`. Topic documents live in `{}/`:\n",
        facts.name, config.docs_dir
    );
    for topic in topics {
        let _ = writeln!(
            out,
            "- [{}]({}/{})",
            topic.title(),
            config.docs_dir,
            topic.filename()
        );
    }
    let _ = writeln!(out, "\n### Commands\n");
    let _ = writeln!(out, "- `docsync status` — pre-flight report, no writes");
    let _ = writeln!(
        out,
        "- `docsync refresh` — bring the documentation set up to date"
    );
    let _ = writeln!(out, "\n### Rules\n");
    let _ = writeln!(
        out,
        "- Files under `{}/` are wholly owned by the generator; put hand-written\n  notes outside this marked section or in separate files.",
        config.docs_dir
    );
    let _ = write!(out, "{}", paths::QUICK_REF_END);
    out
}

/// Render a brand-new quick-reference file around the managed region.
pub fn quick_ref_file(facts: &ProjectFacts, config: &Config, topics: &[Topic]) -> String {
    format!(
        "# {} — quick reference\n\n{}\n",
        facts.name,
        quick_ref_section(facts, config, topics)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::survey;
    use tempfile::TempDir;

    fn facts_for(tree: &[(&str, &str)]) -> ProjectFacts {
        let dir = TempDir::new().unwrap();
        for (rel, content) in tree {
            let path = dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        survey(dir.path(), &Config::default()).unwrap()
    }

    #[test]
    fn rendering_is_deterministic() {
        let facts = facts_for(&[("src/auth.ts", ""), ("package.json", "{}")]);
        let config = Config::default();
        let a = topic_document(Topic::Architecture, &facts, SourceKind::DirectInspection, &config);
        let b = topic_document(Topic::Architecture, &facts, SourceKind::DirectInspection, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn authentication_document_lists_signals() {
        let facts = facts_for(&[("src/lib/auth.ts", "")]);
        let doc = topic_document(
            Topic::Authentication,
            &facts,
            SourceKind::DirectInspection,
            &Config::default(),
        );
        assert!(doc.starts_with(GENERATED_HEADER));
        assert!(doc.contains("# Authentication"));
        assert!(doc.contains("- `src/lib/auth.ts`"));
    }

    #[test]
    fn architecture_document_mentions_index_only_when_used() {
        let facts = facts_for(&[("src/main.rs", "")]);
        let config = Config::default();
        let with_index =
            topic_document(Topic::Architecture, &facts, SourceKind::Index, &config);
        let without =
            topic_document(Topic::Architecture, &facts, SourceKind::DirectInspection, &config);
        assert!(with_index.contains("PROJECT_INDEX.json"));
        assert!(!without.contains("PROJECT_INDEX.json"));
    }

    #[test]
    fn development_document_reflects_manifests() {
        let facts = facts_for(&[("Cargo.toml", "[package]\nname = \"svc\"\n")]);
        let doc = topic_document(
            Topic::Development,
            &facts,
            SourceKind::DirectInspection,
            &Config::default(),
        );
        assert!(doc.contains("cargo build"));
        assert!(!doc.contains("npm install"));
    }

    #[test]
    fn quick_ref_section_links_only_present_topics() {
        let facts = facts_for(&[("src/main.rs", "")]);
        let config = Config::default();
        let section = quick_ref_section(
            &facts,
            &config,
            &[Topic::Architecture, Topic::Development],
        );
        assert!(section.starts_with(paths::QUICK_REF_START));
        assert!(section.ends_with(paths::QUICK_REF_END));
        assert!(section.contains("docs/architecture.md"));
        assert!(!section.contains("docs/authentication.md"));
    }

    #[test]
    fn quick_ref_file_wraps_section_with_title() {
        let facts = facts_for(&[("package.json", r#"{"name": "storefront"}"#)]);
        let file = quick_ref_file(&facts, &Config::default(), &[Topic::Architecture]);
        assert!(file.starts_with("# storefront — quick reference"));
        assert!(file.contains(paths::QUICK_REF_START));
    }
}
