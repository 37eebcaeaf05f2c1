//! Local override layering
//!
//! Overrides are applied on top of freshly staged upstream content in two
//! ordered steps: verbatim file replacement, then idempotent section
//! injection into the skill's primary document. A section whose heading
//! is already present is never injected again, which is what keeps
//! repeated syncs from duplicating content.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use skillsync_fs::copy_dir;

use crate::{CatalogLayout, Result};

/// A skill's primary document, the target of section patches.
pub const SKILL_DOC: &str = "SKILL.md";

/// Declarative patch spec: section title -> body text.
///
/// Titles are plain text; the engine renders them as `## <title>` and
/// detects presence by exact trimmed-line match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSpec {
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
}

impl PatchSpec {
    /// Parse a patch spec from YAML content.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Everything declared locally for one skill.
#[derive(Debug, Clone, Default)]
pub struct OverrideSpec {
    /// Directory of verbatim file replacements
    pub files_dir: Option<PathBuf>,
    /// Section patches for the primary document
    pub patch: Option<PatchSpec>,
}

impl OverrideSpec {
    /// Discover a skill's overrides from the catalog layout.
    ///
    /// Absent override directory and patch file simply yield an empty spec.
    pub fn discover(layout: &CatalogLayout, skill: &str) -> Result<Self> {
        let files_dir = layout.override_files_dir(skill);
        let files_dir = files_dir.is_dir().then_some(files_dir);

        let patch_path = layout.patch_spec_path(skill);
        let patch = if patch_path.is_file() {
            Some(PatchSpec::parse(&fs::read_to_string(&patch_path)?)?)
        } else {
            None
        };

        Ok(Self { files_dir, patch })
    }

    pub fn is_empty(&self) -> bool {
        self.files_dir.is_none() && self.patch.is_none()
    }

    /// Apply this spec to a skill directory: file replacements first, then
    /// section injection. Safe to run any number of times with the same
    /// spec; the result after the first application never changes.
    pub fn apply(&self, skill_dir: &Path) -> Result<()> {
        if let Some(files_dir) = &self.files_dir {
            copy_dir(files_dir, skill_dir)?;
            tracing::debug!(dir = %files_dir.display(), "override files applied");
        }

        if let Some(patch) = &self.patch
            && !patch.sections.is_empty()
        {
            apply_patch(&skill_dir.join(SKILL_DOC), patch)?;
        }

        Ok(())
    }
}

/// Inject each missing section at the end of the document.
///
/// A missing document is treated as empty, so a patch spec alone can
/// produce a primary document.
fn apply_patch(doc_path: &Path, patch: &PatchSpec) -> Result<()> {
    let mut content = if doc_path.is_file() {
        fs::read_to_string(doc_path)?
    } else {
        String::new()
    };
    let mut changed = false;

    for (title, body) in &patch.sections {
        let heading = format!("## {}", title);
        let present = content.lines().any(|line| line.trim() == heading);
        if present {
            tracing::debug!(section = %title, "section already present, skipping");
            continue;
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&heading);
        content.push_str("\n\n");
        content.push_str(body.trim_end());
        content.push('\n');
        changed = true;
    }

    if changed {
        fs::write(doc_path, content)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn patch(sections: &[(&str, &str)]) -> PatchSpec {
        PatchSpec {
            sections: sections
                .iter()
                .map(|(t, b)| (t.to_string(), b.to_string()))
                .collect(),
        }
    }

    #[test]
    fn parse_reads_sections() {
        let spec = PatchSpec::parse("sections:\n  Local Notes: Use the staging cluster.\n").unwrap();
        assert_eq!(spec.sections["Local Notes"], "Use the staging cluster.");
    }

    #[test]
    fn file_overrides_replace_staged_content() {
        let skill = tempfile::tempdir().unwrap();
        fs::write(skill.path().join("SKILL.md"), "upstream\n").unwrap();

        let overrides = tempfile::tempdir().unwrap();
        fs::write(overrides.path().join("SKILL.md"), "local\n").unwrap();
        fs::create_dir(overrides.path().join("extra")).unwrap();
        fs::write(overrides.path().join("extra/notes.md"), "notes\n").unwrap();

        let spec = OverrideSpec {
            files_dir: Some(overrides.path().to_path_buf()),
            patch: None,
        };
        spec.apply(skill.path()).unwrap();

        assert_eq!(
            fs::read_to_string(skill.path().join("SKILL.md")).unwrap(),
            "local\n"
        );
        assert_eq!(
            fs::read_to_string(skill.path().join("extra/notes.md")).unwrap(),
            "notes\n"
        );
    }

    #[test]
    fn patch_appends_missing_section() {
        let skill = tempfile::tempdir().unwrap();
        fs::write(skill.path().join(SKILL_DOC), "# Demo\n\nBody.\n").unwrap();

        let spec = OverrideSpec {
            files_dir: None,
            patch: Some(patch(&[("Local Notes", "Use the staging cluster.")])),
        };
        spec.apply(skill.path()).unwrap();

        let doc = fs::read_to_string(skill.path().join(SKILL_DOC)).unwrap();
        assert_eq!(doc, "# Demo\n\nBody.\n\n## Local Notes\n\nUse the staging cluster.\n");
    }

    #[test]
    fn patch_is_idempotent() {
        let skill = tempfile::tempdir().unwrap();
        fs::write(skill.path().join(SKILL_DOC), "# Demo\n").unwrap();

        let spec = OverrideSpec {
            files_dir: None,
            patch: Some(patch(&[("Local Notes", "body")])),
        };
        spec.apply(skill.path()).unwrap();
        let once = fs::read_to_string(skill.path().join(SKILL_DOC)).unwrap();

        spec.apply(skill.path()).unwrap();
        let twice = fs::read_to_string(skill.path().join(SKILL_DOC)).unwrap();

        assert_eq!(once, twice);
        let count = twice
            .lines()
            .filter(|line| line.trim() == "## Local Notes")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn preexisting_heading_is_not_reinjected() {
        let skill = tempfile::tempdir().unwrap();
        fs::write(
            skill.path().join(SKILL_DOC),
            "# Demo\n\n## Local Notes\n\nAlready customized.\n",
        )
        .unwrap();

        let spec = OverrideSpec {
            files_dir: None,
            patch: Some(patch(&[("Local Notes", "would duplicate")])),
        };
        spec.apply(skill.path()).unwrap();

        let doc = fs::read_to_string(skill.path().join(SKILL_DOC)).unwrap();
        assert!(doc.contains("Already customized."));
        assert!(!doc.contains("would duplicate"));
    }

    #[test]
    fn patch_creates_missing_document() {
        let skill = tempfile::tempdir().unwrap();

        let spec = OverrideSpec {
            files_dir: None,
            patch: Some(patch(&[("Local Notes", "body")])),
        };
        spec.apply(skill.path()).unwrap();

        let doc = fs::read_to_string(skill.path().join(SKILL_DOC)).unwrap();
        assert_eq!(doc, "## Local Notes\n\nbody\n");
    }

    #[test]
    fn discover_empty_when_nothing_declared() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CatalogLayout::new(dir.path());
        let spec = OverrideSpec::discover(&layout, "demo").unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn discover_finds_files_and_patch() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CatalogLayout::new(dir.path());
        fs::create_dir_all(layout.override_files_dir("demo")).unwrap();
        fs::write(
            layout.patch_spec_path("demo"),
            "sections:\n  Local Notes: body\n",
        )
        .unwrap();

        let spec = OverrideSpec::discover(&layout, "demo").unwrap();
        assert!(spec.files_dir.is_some());
        assert_eq!(spec.patch.unwrap().sections.len(), 1);
    }
}
