//! Exact-commit subtree export
//!
//! Materializes one subtree of a commit from the object database into a
//! destination directory. Used for both the catalog copy (floating skills
//! export at the mirror head) and pinned retrieval (export at the pin),
//! keeping both paths independent of the mirror's working tree.

use std::fs;
use std::path::Path;

use git2::{Commit, ObjectType, Repository, Tree};

use crate::{Error, Result};

/// Write the files under `source_relative_path` of `commit` into `dest`.
///
/// `dest` is created if needed; existing files are overwritten. Submodule
/// entries are skipped with a warning.
///
/// # Errors
///
/// Returns `Error::SubtreeNotFound` when the commit's tree has no entry at
/// `source_relative_path` (a declared skill missing upstream).
pub fn export_subtree(
    repo: &Repository,
    commit: &Commit,
    source_relative_path: &str,
    dest: &Path,
) -> Result<()> {
    let tree = commit.tree()?;
    let rel = source_relative_path.trim_matches('/');

    let subtree = if rel.is_empty() {
        tree
    } else {
        let not_found = || Error::SubtreeNotFound {
            commit: commit.id().to_string(),
            path: rel.to_string(),
        };
        let entry = tree.get_path(Path::new(rel)).map_err(|_| not_found())?;
        entry
            .to_object(repo)?
            .into_tree()
            .map_err(|_| not_found())?
    };

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    write_tree(repo, &subtree, dest)
}

fn write_tree(repo: &Repository, tree: &Tree<'_>, dest: &Path) -> Result<()> {
    for entry in tree.iter() {
        let Some(name) = entry.name() else {
            tracing::warn!("skipping tree entry with non-UTF-8 name");
            continue;
        };
        let path = dest.join(name);

        match entry.kind() {
            Some(ObjectType::Tree) => {
                let object = entry.to_object(repo)?;
                let Ok(subtree) = object.into_tree() else {
                    continue;
                };
                fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
                write_tree(repo, &subtree, &path)?;
            }
            Some(ObjectType::Blob) => {
                let object = entry.to_object(repo)?;
                let Ok(blob) = object.into_blob() else {
                    continue;
                };
                fs::write(&path, blob.content()).map_err(|e| Error::io(&path, e))?;

                #[cfg(unix)]
                if entry.filemode() == 0o100755 {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                        .map_err(|e| Error::io(&path, e))?;
                }
            }
            kind => {
                tracing::warn!(entry = name, ?kind, "skipping unsupported tree entry");
            }
        }
    }
    Ok(())
}
