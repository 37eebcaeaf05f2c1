//! List commands for skills and categories

use std::path::Path;

use colored::Colorize;

use skillsync_core::CatalogLayout;
use skillsync_manifest::{Manifest, SkillSpec};

use crate::error::Result;

fn version_column(spec: &SkillSpec) -> String {
    match &spec.pinned_commit {
        Some(commit) => {
            let short = commit.get(..8).unwrap_or(commit);
            format!("pinned {}", short)
        }
        None => spec.track_ref.clone(),
    }
}

/// Run the list-external command
pub fn run_list_external(catalog: &Path) -> Result<()> {
    let layout = CatalogLayout::new(catalog);
    let manifest = Manifest::load(&layout.manifest_path())?;

    println!("{}", "External Skills".bold());
    println!();

    let mut count = 0;
    for (name, spec) in manifest.external_skills() {
        println!(
            "  {:<28} {:<14} {:<18} tier {}  {}",
            name.green(),
            spec.source.cyan(),
            version_column(spec),
            spec.tier,
            spec.category.dimmed()
        );
        count += 1;
    }

    if count == 0 {
        println!("  {}", "none declared".dimmed());
    }
    println!();
    println!(
        "{} {} external skills. Run {} to synchronize.",
        "Total:".dimmed(),
        count,
        "skillsync sync".cyan()
    );
    Ok(())
}

/// Run the list-local command
pub fn run_list_local(catalog: &Path) -> Result<()> {
    let layout = CatalogLayout::new(catalog);
    let manifest = Manifest::load(&layout.manifest_path())?;

    println!("{}", "Local Skills".bold());
    println!();

    let mut count = 0;
    for (name, spec) in manifest.local_skills() {
        let present = layout.skill_dir(name).is_dir();
        println!(
            "  {:<28} tier {}  {:<14} {}",
            name.green(),
            spec.tier,
            spec.category.dimmed(),
            if present {
                "present".normal()
            } else {
                "missing from catalog".yellow()
            }
        );
        count += 1;
    }

    if count == 0 {
        println!("  {}", "none declared".dimmed());
    }
    println!();
    println!("{} {} local skills (never touched by sync).", "Total:".dimmed(), count);
    Ok(())
}

/// Run the list-categories command
pub fn run_list_categories(catalog: &Path) -> Result<()> {
    let layout = CatalogLayout::new(catalog);
    let manifest = Manifest::load(&layout.manifest_path())?;

    println!("{}", "Categories".bold());
    println!();

    for category in manifest.categories() {
        let members = manifest
            .skills
            .values()
            .filter(|s| s.category == category)
            .count();
        println!("  {:<20} {} skills", category.green(), members);
    }
    Ok(())
}
