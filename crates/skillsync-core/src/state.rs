//! Persistent sync state
//!
//! The JSON side-record of what each skill was last synchronized to.
//! Records are replaced wholesale on every successful sync; no history
//! is retained. The document is the source of truth for `status` and the
//! fallback reference for `diff` when a mirror is unavailable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillsync_fs::write_atomic;

use crate::Result;

/// One skill's last-synced provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub source: String,
    pub resolved_commit: String,
    pub synced_at: DateTime<Utc>,
}

/// The full sync-state document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncState {
    #[serde(default)]
    pub last_synced_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillRecord>,
}

/// JSON-backed store with point queries and full dumps.
#[derive(Debug, Clone)]
pub struct SyncStateStore {
    path: PathBuf,
}

impl SyncStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full load; a missing document reads as the empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    pub fn read(&self) -> Result<SyncState> {
        if !self.path.exists() {
            return Ok(SyncState::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Record a skill's sync outcome, replacing any prior record wholesale.
    ///
    /// Read-modify-write under the orchestration lock; the write itself is
    /// atomic (temp-then-rename).
    pub fn record(&self, skill: &str, source: &str, resolved_commit: &str) -> Result<()> {
        let mut state = self.read()?;
        let now = Utc::now();
        state.last_synced_at = Some(now);
        state.skills.insert(
            skill.to_string(),
            SkillRecord {
                source: source.to_string(),
                resolved_commit: resolved_commit.to_string(),
                synced_at: now,
            },
        );
        self.write(&state)
    }

    /// Point query for one skill's last-known record.
    pub fn last_known(&self, skill: &str) -> Result<Option<SkillRecord>> {
        Ok(self.read()?.skills.get(skill).cloned())
    }

    fn write(&self, state: &SyncState) -> Result<()> {
        let mut content = serde_json::to_vec_pretty(state)?;
        content.push(b'\n');
        write_atomic(&self.path, &content)?;
        Ok(())
    }
}
