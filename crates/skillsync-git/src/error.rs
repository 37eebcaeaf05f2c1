//! Error types for skillsync-git

use std::path::PathBuf;

/// Result type for skillsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skillsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] skillsync_fs::Error),

    #[error("Fetch from source '{source_id}' failed: {message}")]
    FetchFailed { source_id: String, message: String },

    #[error("Mirror for source '{source_id}' not found at {path}")]
    MirrorNotFound { source_id: String, path: PathBuf },

    #[error("Commit {commit} not found in source '{source_id}'")]
    CommitNotFound { source_id: String, commit: String },

    #[error("Path '{path}' not present in commit {commit}")]
    SubtreeNotFound { commit: String, path: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
