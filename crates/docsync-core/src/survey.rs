//! Direct source inspection: survey the tree for per-topic evidence.
//!
//! A full regeneration only emits a conditional topic document when the
//! survey found concrete supporting evidence for it — a directory-layout
//! signal (the same mapping table used for change detection) or a
//! dependency named in a recognized manifest. Read-only, no side effects.

use crate::config::Config;
use crate::error::Result;
use crate::mapping::TopicMapper;
use crate::topic::Topic;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;
use walkdir::WalkDir;

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// Per-topic evidence gathered from the tree, each entry keeping the literal
/// signals (paths or dependency names) that justified it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evidence {
    map: BTreeMap<Topic, BTreeSet<String>>,
}

impl Evidence {
    fn add(&mut self, topic: Topic, signal: impl Into<String>) {
        self.map.entry(topic).or_default().insert(signal.into());
    }

    pub fn supports(&self, topic: Topic) -> bool {
        self.map.get(&topic).is_some_and(|s| !s.is_empty())
    }

    pub fn signals(&self, topic: Topic) -> Vec<&str> {
        self.map
            .get(&topic)
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Conditional topics with at least one supporting signal.
    pub fn supported_topics(&self) -> Vec<Topic> {
        Topic::all()
            .iter()
            .copied()
            .filter(|t| !t.is_unconditional() && self.supports(*t))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ProjectFacts
// ---------------------------------------------------------------------------

/// What the survey learned about the project. Input to document rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectFacts {
    pub name: String,
    /// Recognized build/dependency manifests, root-relative.
    pub manifests: Vec<String>,
    /// Immediate subdirectories of the root, sorted.
    pub top_level_dirs: Vec<String>,
    /// Number of files visited by the survey.
    pub file_count: usize,
    pub evidence: Evidence,
}

// ---------------------------------------------------------------------------
// Dependency signals
// ---------------------------------------------------------------------------

/// Dependency-name patterns that count as evidence for a topic, matched
/// against manifest dependency entries.
const DEP_SIGNALS: &[(Topic, &str)] = &[
    (
        Topic::Authentication,
        r"(?i)^(passport|jsonwebtoken|next-auth|@auth/|oauth2?|bcrypt|argon2|jose)",
    ),
    (Topic::Permissions, r"(?i)^(casbin|@casl/|casl|accesscontrol)"),
    (
        Topic::Database,
        r"(?i)^(prisma|@prisma/|sequelize|typeorm|knex|mongoose|drizzle-orm|pg|mysql2?|sqlite3|diesel|sqlx|sea-orm|rusqlite)",
    ),
    (
        Topic::Api,
        r"(?i)^(express|fastify|koa|hapi|@nestjs/|graphql|@trpc/|axum|actix-web|warp|rocket|tonic)",
    ),
    (
        Topic::Testing,
        r"(?i)^(jest|vitest|mocha|cypress|playwright|@playwright/|@testing-library/|supertest|proptest|insta|mockall)",
    ),
];

fn dep_signal_patterns() -> &'static Vec<(Topic, Regex)> {
    static PATTERNS: OnceLock<Vec<(Topic, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DEP_SIGNALS
            .iter()
            .map(|(topic, pattern)| (*topic, Regex::new(pattern).unwrap()))
            .collect()
    })
}

fn topics_for_dependency(name: &str) -> Vec<Topic> {
    dep_signal_patterns()
        .iter()
        .filter(|(_, re)| re.is_match(name))
        .map(|(topic, _)| *topic)
        .collect()
}

// ---------------------------------------------------------------------------
// Manifest readers
// ---------------------------------------------------------------------------

const MANIFEST_NAMES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "go.mod",
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
];

fn scan_package_json(content: &str, rel: &str, evidence: &mut Evidence) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(content).ok()?;
    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = value.get(section).and_then(|d| d.as_object()) {
            for name in deps.keys() {
                for topic in topics_for_dependency(name) {
                    evidence.add(topic, format!("{name} ({rel})"));
                }
            }
        }
    }
    value
        .get("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
}

fn cargo_dep_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Dependency table entries: `name = "1.0"` or `name = { version = ... }`
    RE.get_or_init(|| Regex::new(r#"(?m)^([A-Za-z0-9_-]+)\s*=\s*(?:"|\{)"#).unwrap())
}

fn cargo_package_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^name\s*=\s*"([^"]+)""#).unwrap())
}

fn scan_cargo_toml(content: &str, rel: &str, evidence: &mut Evidence) -> Option<String> {
    for caps in cargo_dep_name_re().captures_iter(content) {
        let name = &caps[1];
        for topic in topics_for_dependency(name) {
            evidence.add(topic, format!("{name} ({rel})"));
        }
    }
    cargo_package_name_re()
        .captures(content)
        .map(|caps| caps[1].to_string())
}

// ---------------------------------------------------------------------------
// survey()
// ---------------------------------------------------------------------------

/// Directories never descended into during the survey.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    ".next",
    "vendor",
];

/// Walk the tree under `root` and gather project facts and per-topic
/// evidence. The docs directory itself is excluded — generated output is
/// not evidence.
pub fn survey(root: &Path, config: &Config) -> Result<ProjectFacts> {
    let mapper = TopicMapper::default();
    let mut evidence = Evidence::default();
    let mut manifests = Vec::new();
    let mut top_level_dirs = BTreeSet::new();
    let mut file_count = 0usize;
    let mut manifest_name: Option<String> = None;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            if entry.file_type().is_dir() {
                return !SKIP_DIRS.contains(&name.as_ref()) && name != config.docs_dir;
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {e}");
                continue;
            }
        };
        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel_path.to_string_lossy().replace('\\', "/");
        if rel.is_empty() {
            continue;
        }

        if entry.file_type().is_dir() {
            if !rel.contains('/') {
                top_level_dirs.insert(rel.clone());
            }
            continue;
        }
        // The tool's own outputs are not evidence.
        if rel == config.quick_reference || rel == config.index_file {
            continue;
        }
        file_count += 1;

        // Layout signals reuse the change-detection mapping table.
        for topic in mapper.topics_for(&rel) {
            if !topic.is_unconditional() {
                evidence.add(topic, rel.clone());
            }
        }

        let file_name = entry.file_name().to_string_lossy();
        if MANIFEST_NAMES.contains(&file_name.as_ref()) {
            manifests.push(rel.clone());
            let content = std::fs::read_to_string(entry.path()).unwrap_or_default();
            let found_name = match file_name.as_ref() {
                "package.json" => scan_package_json(&content, &rel, &mut evidence),
                "Cargo.toml" => scan_cargo_toml(&content, &rel, &mut evidence),
                _ => None,
            };
            // Only the root manifest may name the project.
            if manifest_name.is_none() && !rel.contains('/') {
                manifest_name = found_name;
            }
        }
    }

    manifests.sort();
    let name = config
        .project
        .clone()
        .or(manifest_name)
        .or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "project".to_string());

    Ok(ProjectFacts {
        name,
        manifests,
        top_level_dirs: top_level_dirs.into_iter().collect(),
        file_count,
        evidence,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
