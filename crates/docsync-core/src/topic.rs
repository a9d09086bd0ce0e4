use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// A documentation topic, each backed by one file in the docs directory.
///
/// `Architecture` and `Development` are always emitted by a full
/// regeneration; the rest are emitted only when the source tree shows
/// supporting evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Architecture,
    Development,
    Database,
    Api,
    Authentication,
    Permissions,
    Testing,
}

impl Topic {
    pub fn all() -> &'static [Topic] {
        &[
            Topic::Architecture,
            Topic::Development,
            Topic::Database,
            Topic::Api,
            Topic::Authentication,
            Topic::Permissions,
            Topic::Testing,
        ]
    }

    /// Topics emitted by a full regeneration regardless of detected evidence.
    pub fn unconditional() -> &'static [Topic] {
        &[Topic::Architecture, Topic::Development]
    }

    pub fn is_unconditional(self) -> bool {
        matches!(self, Topic::Architecture | Topic::Development)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Architecture => "architecture",
            Topic::Development => "development",
            Topic::Database => "database",
            Topic::Api => "api",
            Topic::Authentication => "authentication",
            Topic::Permissions => "permissions",
            Topic::Testing => "testing",
        }
    }

    /// Filename of this topic's document inside the docs directory.
    pub fn filename(self) -> &'static str {
        match self {
            Topic::Architecture => "architecture.md",
            Topic::Development => "development.md",
            Topic::Database => "database.md",
            Topic::Api => "api.md",
            Topic::Authentication => "authentication.md",
            Topic::Permissions => "permissions.md",
            Topic::Testing => "testing.md",
        }
    }

    /// Heading used at the top of the generated document.
    pub fn title(self) -> &'static str {
        match self {
            Topic::Architecture => "Architecture",
            Topic::Development => "Development",
            Topic::Database => "Database",
            Topic::Api => "API",
            Topic::Authentication => "Authentication",
            Topic::Permissions => "Permissions",
            Topic::Testing => "Testing",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = crate::error::DocsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "architecture" => Ok(Topic::Architecture),
            "development" => Ok(Topic::Development),
            "database" => Ok(Topic::Database),
            "api" => Ok(Topic::Api),
            "authentication" => Ok(Topic::Authentication),
            "permissions" => Ok(Topic::Permissions),
            "testing" => Ok(Topic::Testing),
            _ => Err(crate::error::DocsyncError::UnknownTopic(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
