//! Status command implementation

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use skillsync_core::{CatalogLayout, SyncStateStore};
use skillsync_manifest::Manifest;

use crate::error::Result;

/// One row of the status report.
#[derive(Debug, Serialize)]
struct StatusEntry {
    name: String,
    source: String,
    tier: u8,
    category: String,
    local: bool,
    pinned: bool,
    /// Present in the catalog's skills directory
    present: bool,
    resolved_commit: Option<String>,
    synced_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    last_synced_at: Option<chrono::DateTime<chrono::Utc>>,
    skills: Vec<StatusEntry>,
}

fn build_report(layout: &CatalogLayout, manifest: &Manifest) -> Result<StatusReport> {
    let state = SyncStateStore::new(layout.state_path()).read()?;

    let skills = manifest
        .skills
        .iter()
        .map(|(name, spec)| {
            let record = state.skills.get(name);
            StatusEntry {
                name: name.clone(),
                source: spec.source.clone(),
                tier: spec.tier,
                category: spec.category.clone(),
                local: spec.local,
                pinned: spec.pinned_commit.is_some(),
                present: layout.skill_dir(name).is_dir(),
                resolved_commit: record.map(|r| r.resolved_commit.clone()),
                synced_at: record.map(|r| r.synced_at),
            }
        })
        .collect();

    Ok(StatusReport {
        last_synced_at: state.last_synced_at,
        skills,
    })
}

/// Run the status command
pub fn run_status(catalog: &Path, json: bool) -> Result<()> {
    let layout = CatalogLayout::new(catalog);
    let manifest = Manifest::load(&layout.manifest_path())?;
    let report = build_report(&layout, &manifest)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Catalog Status".bold());
    println!();

    for entry in &report.skills {
        let state_column = if entry.local {
            "local".dimmed()
        } else {
            match (&entry.resolved_commit, entry.present) {
                (Some(commit), true) => {
                    let short = commit.get(..8).unwrap_or(commit);
                    format!("synced @ {}", short).as_str().normal()
                }
                (Some(_), false) => "recorded but missing on disk".yellow(),
                (None, _) => "never synced".yellow(),
            }
        };
        println!(
            "  {:<28} {:<14} tier {}  {}",
            entry.name.green(),
            entry.source.cyan(),
            entry.tier,
            state_column
        );
    }

    println!();
    match report.last_synced_at {
        Some(at) => println!("{} last sync at {}", "OK".green().bold(), at.to_rfc3339()),
        None => println!(
            "{} Catalog has never been synchronized. Run {}.",
            "note:".yellow().bold(),
            "skillsync sync".cyan()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = r#"
sources:
  upstream-a:
    repository: https://example.com/skills.git
    subpath: skills
skills:
  demo-skill:
    source: upstream-a
  house-style:
    source: upstream-a
    local: true
"#;

    #[test]
    fn status_on_fresh_catalog_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skillsync.yaml"), SAMPLE).unwrap();
        run_status(dir.path(), false).unwrap();
        run_status(dir.path(), true).unwrap();
    }

    #[test]
    fn report_reflects_sync_state() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skillsync.yaml"), SAMPLE).unwrap();

        let layout = CatalogLayout::new(dir.path());
        fs::create_dir_all(layout.skill_dir("demo-skill")).unwrap();
        SyncStateStore::new(layout.state_path())
            .record("demo-skill", "upstream-a", "abc123")
            .unwrap();

        let manifest = Manifest::load(&layout.manifest_path()).unwrap();
        let report = build_report(&layout, &manifest).unwrap();

        assert!(report.last_synced_at.is_some());
        let demo = report.skills.iter().find(|s| s.name == "demo-skill").unwrap();
        assert_eq!(demo.resolved_commit.as_deref(), Some("abc123"));
        assert!(demo.present);

        let local = report.skills.iter().find(|s| s.name == "house-style").unwrap();
        assert!(local.local);
        assert_eq!(local.resolved_commit, None);
    }
}
