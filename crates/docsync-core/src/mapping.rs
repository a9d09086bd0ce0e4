//! Static path→topic mapping table.
//!
//! Every changed path is evaluated against every pattern; a path may
//! activate zero, one, or several topics, and no pattern takes precedence
//! over another. The affected-topic set for a run is the union across all
//! changed paths.

use crate::error::{DocsyncError, Result};
use crate::topic::Topic;
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// MappingRule
// ---------------------------------------------------------------------------

/// One (glob pattern, topics) association in the mapping table.
pub struct MappingRule {
    pub pattern: &'static str,
    pub topics: &'static [Topic],
}

/// The built-in mapping table. Paths are matched as slash-separated strings
/// relative to the project root, the way git reports them.
pub fn default_rules() -> &'static [MappingRule] {
    use Topic::*;
    &[
        // Authentication
        MappingRule { pattern: "**/*auth*", topics: &[Authentication] },
        MappingRule { pattern: "**/*login*", topics: &[Authentication] },
        MappingRule { pattern: "**/*session*", topics: &[Authentication] },
        // Permissions
        MappingRule { pattern: "**/*permission*", topics: &[Permissions] },
        MappingRule { pattern: "**/*role*", topics: &[Permissions] },
        MappingRule { pattern: "**/*rbac*", topics: &[Permissions] },
        // Middleware sits on the request path and commonly enforces both
        MappingRule { pattern: "**/middleware/**", topics: &[Api, Authentication, Permissions] },
        // API surface
        MappingRule { pattern: "**/routes/**", topics: &[Api] },
        MappingRule { pattern: "**/api/**", topics: &[Api] },
        MappingRule { pattern: "**/controllers/**", topics: &[Api] },
        MappingRule { pattern: "**/handlers/**", topics: &[Api] },
        // Database
        MappingRule { pattern: "**/migrations/**", topics: &[Database] },
        MappingRule { pattern: "**/models/**", topics: &[Database] },
        MappingRule { pattern: "**/prisma/**", topics: &[Database] },
        MappingRule { pattern: "**/*.sql", topics: &[Database] },
        MappingRule { pattern: "**/schema.*", topics: &[Database] },
        // Testing
        MappingRule { pattern: "**/*.test.*", topics: &[Testing] },
        MappingRule { pattern: "**/*.spec.*", topics: &[Testing] },
        MappingRule { pattern: "**/tests/**", topics: &[Testing] },
        MappingRule { pattern: "**/__tests__/**", topics: &[Testing] },
        // Manifests and toolchain config shape both the architecture and
        // the development docs
        MappingRule { pattern: "**/package.json", topics: &[Architecture, Development] },
        MappingRule { pattern: "**/Cargo.toml", topics: &[Architecture, Development] },
        MappingRule { pattern: "**/pyproject.toml", topics: &[Architecture, Development] },
        MappingRule { pattern: "**/go.mod", topics: &[Architecture, Development] },
        MappingRule { pattern: "**/tsconfig.json", topics: &[Development] },
        MappingRule { pattern: "**/*.config.*", topics: &[Development] },
        MappingRule { pattern: "**/Dockerfile", topics: &[Development] },
        MappingRule { pattern: "**/docker-compose*", topics: &[Development] },
        MappingRule { pattern: "**/.env*", topics: &[Development] },
    ]
}

// ---------------------------------------------------------------------------
// TopicMapper
// ---------------------------------------------------------------------------

/// Evaluation of the changed-path set against the mapping table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingOutcome {
    /// Union of topics activated by at least one changed path.
    pub affected: BTreeSet<Topic>,
    /// Paths that matched no pattern — analyzed, no doc impact.
    pub unmatched: Vec<String>,
}

/// Mapping table with its patterns compiled once.
pub struct TopicMapper {
    rules: Vec<(Pattern, &'static [Topic])>,
}

impl TopicMapper {
    pub fn new(rules: &'static [MappingRule]) -> Result<TopicMapper> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let pattern =
                Pattern::new(rule.pattern).map_err(|e| DocsyncError::InvalidPattern {
                    pattern: rule.pattern.to_string(),
                    reason: e.to_string(),
                })?;
            compiled.push((pattern, rule.topics));
        }
        Ok(TopicMapper { rules: compiled })
    }

    /// Topics activated by a single path, in table order with duplicates
    /// collapsed.
    pub fn topics_for(&self, path: &str) -> BTreeSet<Topic> {
        let mut topics = BTreeSet::new();
        for (pattern, rule_topics) in &self.rules {
            if pattern.matches(path) {
                topics.extend(rule_topics.iter().copied());
            }
        }
        topics
    }

    /// Evaluate every path against every pattern and union the results.
    pub fn evaluate<'a, I>(&self, paths: I) -> MappingOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outcome = MappingOutcome::default();
        for path in paths {
            let topics = self.topics_for(path);
            if topics.is_empty() {
                outcome.unmatched.push(path.to_string());
            } else {
                outcome.affected.extend(topics);
            }
        }
        outcome
    }
}

impl Default for TopicMapper {
    fn default() -> Self {
        // The built-in table is static and known-valid.
        TopicMapper::new(default_rules()).expect("built-in mapping table compiles")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
