//! Error types shared by the generation pipeline

use thiserror::Error;

/// Fatal configuration errors. Any of these aborts a run before content is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Blog configuration is required")]
    Missing,

    #[error("Blog site configuration with title is required")]
    MissingSiteTitle,

    #[error("Blog site configuration with description is required")]
    MissingSiteDescription,

    #[error("Blog basics configuration with author name is required")]
    MissingAuthorName,

    #[error("Failed to read blog configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in blog configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML in blog configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Per-item content failure. Never aborts a run; each kind renders its own placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("no content found")]
    NoContent,

    #[error("failed to render content: {0}")]
    Render(String),

    #[error("failed to process content: {0}")]
    Process(String),
}

impl ContentError {
    /// HTML that stands in for the item's rendered content
    pub fn placeholder(&self) -> &'static str {
        match self {
            ContentError::NoContent => "<p>Error: No content found</p>",
            ContentError::Render(_) => "<p>Error: Failed to render content</p>",
            ContentError::Process(_) => "<p>Error: Failed to process content</p>",
        }
    }
}

/// Library-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, Error>;
