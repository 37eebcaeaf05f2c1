//! Manifest parsing for the skills manifest document
//!
//! The manifest declares upstream sources and the skills synchronized from
//! them. It is immutable input: there are no mutation methods, and every
//! skill's `source` reference is validated against the declared sources at
//! parse time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

fn default_ref() -> String {
    "main".to_string()
}

fn default_tier() -> u8 {
    1
}

fn default_category() -> String {
    "general".to_string()
}

/// A declared upstream repository plus the directory inside it that
/// holds skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Clone/fetch URL of the upstream repository
    pub repository: String,
    /// Directory inside the repository that contains skills
    pub subpath: String,
}

/// Per-skill declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSpec {
    /// Owning source id; must exist in `sources`
    pub source: String,

    /// Floating ref tracked when no pin is set
    #[serde(default = "default_ref", rename = "ref")]
    pub track_ref: String,

    /// Exact commit to resolve to, ignoring ref drift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_commit: Option<String>,

    /// Catalog-resident skill: never fetched or overwritten by sync
    #[serde(default)]
    pub local: bool,

    #[serde(default = "default_tier")]
    pub tier: u8,

    #[serde(default = "default_category")]
    pub category: String,
}

/// The skills manifest: sources plus the skills declared against them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,

    #[serde(default)]
    pub skills: BTreeMap<String, SkillSpec>,
}

impl Manifest {
    /// Parse a manifest from YAML content.
    ///
    /// Validates the source-reference invariant: every non-local skill's
    /// `source` must name a declared source. Local skills may omit a real
    /// source binding but are validated the same way for consistency.
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` on malformed YAML and
    /// `Error::UndeclaredSource` on a dangling source reference.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        for (name, spec) in &manifest.skills {
            if !manifest.sources.contains_key(&spec.source) {
                return Err(Error::UndeclaredSource {
                    skill: name.clone(),
                    source_id: spec.source.clone(),
                });
            }
        }
        Ok(manifest)
    }

    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ManifestNotFound` when the file does not exist, in
    /// addition to the errors of [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// All external (non-local) skills, in name order.
    pub fn external_skills(&self) -> impl Iterator<Item = (&String, &SkillSpec)> {
        self.skills.iter().filter(|(_, spec)| !spec.local)
    }

    /// All local (catalog-resident) skills, in name order.
    pub fn local_skills(&self) -> impl Iterator<Item = (&String, &SkillSpec)> {
        self.skills.iter().filter(|(_, spec)| spec.local)
    }

    /// Look up a single skill's spec.
    pub fn skill(&self, name: &str) -> Option<&SkillSpec> {
        self.skills.get(name)
    }

    /// Look up a single source's spec.
    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    /// Distinct categories across all skills, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.skills.values().map(|s| s.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
