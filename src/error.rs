use thiserror::Error;

/// Unified error type for changelog operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Reference error: {0}")]
    Reference(String),

    #[error("Invalid ticket pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Cannot parse configuration file: {0}")]
    ConfigFormat(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in auto-changelog
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a configuration error with context
    pub fn configuration(msg: impl Into<String>) -> Self {
        ChangelogError::Configuration(msg.into())
    }

    /// Create a reference error with context
    pub fn reference(msg: impl Into<String>) -> Self {
        ChangelogError::Reference(msg.into())
    }

    /// The repository has no tag to anchor a release on
    pub fn not_enough_tags() -> Self {
        ChangelogError::configuration("not enough tags to generate changelog")
    }
}
