use thiserror::Error;

/// Unified error type for git-auto operations
#[derive(Error, Debug)]
pub enum GitAutoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not run git: {0}")]
    Launch(String),

    #[error("Git command failed: {0}")]
    Git(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-auto
pub type Result<T> = std::result::Result<T, GitAutoError>;

impl GitAutoError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitAutoError::Config(msg.into())
    }

    /// Create a launch error with context
    pub fn launch(msg: impl Into<String>) -> Self {
        GitAutoError::Launch(msg.into())
    }

    /// Create a git command error with context
    pub fn git(msg: impl Into<String>) -> Self {
        GitAutoError::Git(msg.into())
    }
}
