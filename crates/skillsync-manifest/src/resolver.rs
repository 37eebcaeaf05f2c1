//! Skill resolution
//!
//! Pure mapping from a skill name to its owning source, desired version,
//! and path inside that source. Callers must branch on `local` before
//! invoking fetch logic; resolving a local skill is an error, not a no-op.

use crate::{Error, Manifest, Result};

/// The version a skill should be synchronized to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesiredVersion {
    /// Exact commit; ignores drift on the tracked ref
    Pinned(String),
    /// Floating ref resolved to the mirror's head at sync time
    Ref(String),
}

/// A skill resolved against the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSkill {
    pub name: String,
    pub source_id: String,
    pub version: DesiredVersion,
    /// Path of the skill's directory relative to the source repository root
    pub source_relative_path: String,
}

/// Resolve a skill name to its source, version, and in-source path.
///
/// # Errors
///
/// Returns `Error::SkillNotFound` for names absent from the manifest and
/// `Error::LocalSkill` when invoked for a catalog-resident skill.
pub fn resolve(manifest: &Manifest, name: &str) -> Result<ResolvedSkill> {
    let spec = manifest.skill(name).ok_or_else(|| Error::SkillNotFound {
        name: name.to_string(),
    })?;

    if spec.local {
        return Err(Error::LocalSkill {
            name: name.to_string(),
        });
    }

    // Parse-time validation guarantees the source exists.
    let source = manifest
        .source(&spec.source)
        .ok_or_else(|| Error::UndeclaredSource {
            skill: name.to_string(),
            source_id: spec.source.clone(),
        })?;

    let version = match &spec.pinned_commit {
        Some(commit) => DesiredVersion::Pinned(commit.clone()),
        None => DesiredVersion::Ref(spec.track_ref.clone()),
    };

    let subpath = source.subpath.trim_matches('/');
    let source_relative_path = if subpath.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", subpath, name)
    };

    Ok(ResolvedSkill {
        name: name.to_string(),
        source_id: spec.source.clone(),
        version,
        source_relative_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        Manifest::parse(
            r#"
sources:
  upstream-a:
    repository: https://example.com/skills.git
    subpath: skills/
skills:
  demo-skill:
    source: upstream-a
  pinned-skill:
    source: upstream-a
    pinned_commit: abc123
  house-style:
    source: upstream-a
    local: true
"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_floating_ref() {
        let resolved = resolve(&manifest(), "demo-skill").unwrap();
        assert_eq!(resolved.source_id, "upstream-a");
        assert_eq!(resolved.version, DesiredVersion::Ref("main".into()));
        assert_eq!(resolved.source_relative_path, "skills/demo-skill");
    }

    #[test]
    fn pin_takes_precedence_over_ref() {
        let resolved = resolve(&manifest(), "pinned-skill").unwrap();
        assert_eq!(resolved.version, DesiredVersion::Pinned("abc123".into()));
    }

    #[test]
    fn unknown_skill_is_not_found() {
        let err = resolve(&manifest(), "nope").unwrap_err();
        assert!(matches!(err, Error::SkillNotFound { .. }));
    }

    #[test]
    fn local_skill_is_rejected() {
        let err = resolve(&manifest(), "house-style").unwrap_err();
        assert!(matches!(err, Error::LocalSkill { .. }));
    }

    #[test]
    fn empty_subpath_maps_to_repo_root() {
        let manifest = Manifest::parse(
            r#"
sources:
  flat:
    repository: https://example.com/flat.git
    subpath: ""
skills:
  rooted:
    source: flat
"#,
        )
        .unwrap();
        let resolved = resolve(&manifest, "rooted").unwrap();
        assert_eq!(resolved.source_relative_path, "rooted");
    }
}
