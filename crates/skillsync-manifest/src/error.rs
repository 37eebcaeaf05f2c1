//! Error types for skillsync-manifest

use std::path::PathBuf;

/// Result type for skillsync-manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skillsync-manifest operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("Malformed manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Skill '{skill}' references undeclared source '{source_id}'")]
    UndeclaredSource { skill: String, source_id: String },

    #[error("Skill '{name}' not found in the manifest")]
    SkillNotFound { name: String },

    #[error("Skill '{name}' is local-only and is never fetched from a source")]
    LocalSkill { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
