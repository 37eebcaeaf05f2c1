//! Canonical on-disk layout of a skills catalog

use std::path::{Path, PathBuf};

/// Manifest file name inside the catalog root
pub const MANIFEST_FILE: &str = "skillsync.yaml";
/// Directory holding the catalog copies of skills
pub const SKILLS_DIR: &str = "skills";
/// Directory holding per-skill override files and patch specs
pub const OVERRIDES_DIR: &str = "overrides";
/// Sync-state document, persisted alongside the catalog
pub const STATE_FILE: &str = ".sync-state.json";
/// Singleton lock file
pub const LOCK_FILE: &str = ".sync.lock";
/// Per-source mirror directories
pub const SOURCES_DIR: &str = ".sources";
/// Transient staging directories
pub const STAGING_DIR: &str = ".staging";

/// Resolves every catalog-relative path from a single root directory.
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(SKILLS_DIR)
    }

    /// Catalog copy of one skill.
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.skills_dir().join(name)
    }

    /// Verbatim override files for one skill.
    pub fn override_files_dir(&self, name: &str) -> PathBuf {
        self.root.join(OVERRIDES_DIR).join(name)
    }

    /// Declarative patch spec for one skill.
    pub fn patch_spec_path(&self, name: &str) -> PathBuf {
        self.root
            .join(OVERRIDES_DIR)
            .join(format!("{}.patch.yaml", name))
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(SOURCES_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}
