//! Error types for skillsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from skillsync-core
    #[error(transparent)]
    Core(#[from] skillsync_core::Error),

    /// Error from skillsync-git
    #[error(transparent)]
    Git(#[from] skillsync_git::Error),

    /// Error from skillsync-manifest
    #[error(transparent)]
    Manifest(#[from] skillsync_manifest::Error),

    /// Error from skillsync-fs
    #[error(transparent)]
    Fs(#[from] skillsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
