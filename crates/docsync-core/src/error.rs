use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsyncError {
    #[error("git query failed: {0}")]
    Git(String),

    #[error("git produced non-UTF8 output")]
    GitOutput,

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("invalid mapping pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocsyncError>;
