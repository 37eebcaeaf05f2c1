//! Diff command implementation
//!
//! Stages each skill's upstream content (with overrides layered on, the
//! same shape a sync would produce) and prints unified diffs against the
//! catalog copy. When a source cannot be fetched, falls back to reporting
//! the last-synced commit from the state document.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use colored::Colorize;
use similar::TextDiff;

use skillsync_core::{CatalogLayout, OverrideSpec, SyncStateStore};
use skillsync_fs::compute_dir_checksum;
use skillsync_git::SourceCache;
use skillsync_manifest::{DesiredVersion, Manifest, resolve};

use crate::commands::source_cache;
use crate::error::{CliError, Result};

/// Run the diff command
pub fn run_diff(catalog: &Path, full_history: bool, skill: Option<&str>) -> Result<()> {
    let layout = CatalogLayout::new(catalog);
    let manifest = Manifest::load(&layout.manifest_path())?;
    let cache = source_cache(&layout, full_history);
    let state = SyncStateStore::new(layout.state_path());

    let names: Vec<String> = match skill {
        Some(name) => {
            if manifest.skill(name).is_none() {
                return Err(CliError::user(format!("Unknown skill '{}'", name)));
            }
            vec![name.to_string()]
        }
        None => manifest.external_skills().map(|(n, _)| n.clone()).collect(),
    };

    let mut differing = 0;
    for name in &names {
        if diff_one(&layout, &manifest, &cache, &state, name)? {
            differing += 1;
        }
    }

    println!();
    if differing == 0 {
        println!("{} Catalog matches upstream.", "OK".green().bold());
    } else {
        println!(
            "{} {} of {} skills differ. Run {} to apply.",
            "note:".yellow().bold(),
            differing,
            names.len(),
            "skillsync sync".cyan()
        );
    }
    Ok(())
}

/// Diff one skill; returns whether it differs from its staged upstream.
fn diff_one(
    layout: &CatalogLayout,
    manifest: &Manifest,
    cache: &SourceCache,
    state: &SyncStateStore,
    name: &str,
) -> Result<bool> {
    let resolved = match resolve(manifest, name) {
        Ok(resolved) => resolved,
        Err(skillsync_manifest::Error::LocalSkill { .. }) => {
            println!("{} {} is local; nothing to diff.", "-".dimmed(), name.cyan());
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    let Some(source) = manifest.source(&resolved.source_id) else {
        return Ok(false);
    };
    let Some(spec) = manifest.skill(name) else {
        return Ok(false);
    };

    // Refresh the mirror; a pin can still be exported from a stale mirror.
    let ensured = cache.ensure(
        &resolved.source_id,
        &source.repository,
        &source.subpath,
        &spec.track_ref,
    );
    let commit = match (&resolved.version, &ensured) {
        (DesiredVersion::Pinned(commit), _) => commit.clone(),
        (DesiredVersion::Ref(_), Ok(handle)) => handle.head().to_string(),
        (DesiredVersion::Ref(_), Err(e)) => {
            match state.last_known(name)? {
                Some(record) => println!(
                    "{} {}: source unavailable ({}); last synced at {}",
                    "!".yellow(),
                    name.cyan(),
                    e,
                    record.resolved_commit.get(..8).unwrap_or(&record.resolved_commit)
                ),
                None => println!(
                    "{} {}: source unavailable ({}); never synced",
                    "!".yellow(),
                    name.cyan(),
                    e
                ),
            }
            return Ok(false);
        }
    };

    let staging = tempfile::tempdir()?;
    match cache.export_commit(
        &resolved.source_id,
        &commit,
        &resolved.source_relative_path,
        staging.path(),
    ) {
        Ok(()) => {}
        Err(skillsync_git::Error::SubtreeNotFound { .. }) => {
            println!(
                "{} {}: missing upstream at {}",
                "!".red(),
                name.cyan(),
                commit.get(..8).unwrap_or(&commit)
            );
            return Ok(true);
        }
        Err(e) => return Err(e.into()),
    }

    let overrides = OverrideSpec::discover(layout, name)?;
    overrides.apply(staging.path())?;

    let target = layout.skill_dir(name);
    if compute_dir_checksum(staging.path())? == compute_dir_checksum(&target)? {
        return Ok(false);
    }

    println!(
        "{} {} ({} @ {})",
        "==".blue().bold(),
        name.cyan().bold(),
        resolved.source_id,
        commit.get(..8).unwrap_or(&commit)
    );
    print_tree_diff(&target, staging.path(), name)?;
    Ok(true)
}

/// Unified per-file diff between the catalog copy and the staged tree.
fn print_tree_diff(catalog_dir: &Path, staged_dir: &Path, name: &str) -> Result<()> {
    let mut rels = BTreeSet::new();
    collect_rels(catalog_dir, catalog_dir, &mut rels)?;
    collect_rels(staged_dir, staged_dir, &mut rels)?;

    for rel in rels {
        let old_path = catalog_dir.join(&rel);
        let new_path = staged_dir.join(&rel);
        let old = read_text(&old_path)?;
        let new = read_text(&new_path)?;
        if old == new {
            continue;
        }

        match (old, new) {
            (Some(old), Some(new)) => {
                let diff = TextDiff::from_lines(&old, &new);
                print!(
                    "{}",
                    diff.unified_diff()
                        .context_radius(3)
                        .header(
                            &format!("catalog/skills/{}/{}", name, rel),
                            &format!("upstream/{}", rel)
                        )
                );
            }
            (None, Some(_)) => println!("{} {} (added upstream)", "+".green(), rel),
            (Some(_), None) => println!("{} {} (removed upstream)", "-".red(), rel),
            (None, None) => println!("{} {} (binary files differ)", "!".yellow(), rel),
        }
    }
    Ok(())
}

/// Read a file as text; `Ok(None)` for missing or non-UTF-8 files.
fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(String::from_utf8(fs::read(path)?).ok())
}

fn collect_rels(root: &Path, dir: &Path, out: &mut BTreeSet<String>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_rels(root, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.insert(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}
