//! Error types for skillsync-fs

use std::path::PathBuf;

/// Result type for skillsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skillsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error(
        "Sync already in progress (lock held by process {pid}). \
         If that process is gone, remove the stale lock file at {path}"
    )]
    LockHeld { pid: String, path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
