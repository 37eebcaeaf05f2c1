//! Error types for skillsync-core

/// Result type for skillsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skillsync-core operations
///
/// Fatal conditions (lock held, malformed manifest, unknown skill on
/// `update`) propagate out of the orchestrator; recoverable per-skill
/// conditions are caught at the per-skill boundary and folded into the
/// sync report instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Source '{source_id}' is unavailable: {message}")]
    SourceUnavailable { source_id: String, message: String },

    #[error("Validator failed to run: {message}")]
    ValidatorSpawn { message: String },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] skillsync_fs::Error),

    #[error(transparent)]
    Git(#[from] skillsync_git::Error),

    #[error(transparent)]
    Manifest(#[from] skillsync_manifest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
