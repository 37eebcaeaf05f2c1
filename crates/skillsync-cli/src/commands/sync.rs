//! Sync and update command implementations

use std::path::Path;

use colored::{ColoredString, Colorize};

use skillsync_core::{
    ChangeClass, CommandGateway, SyncFilter, SyncOptions, SyncOutcome, SyncReport,
};
use skillsync_manifest::Manifest;

use crate::commands::engine_for;
use crate::error::{CliError, Result};

fn class_label(class: ChangeClass) -> ColoredString {
    match class {
        ChangeClass::New => "NEW".green().bold(),
        ChangeClass::Updated => "UPDATED".yellow().bold(),
        ChangeClass::Unchanged => "UNCHANGED".dimmed(),
        ChangeClass::Missing => "MISSING".red().bold(),
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    match (outcome.class, &outcome.detail) {
        (Some(class), _) => {
            println!("   {:<28} {}", outcome.skill.cyan(), class_label(class));
        }
        (None, Some(detail)) => {
            println!(
                "   {:<28} {} {}",
                outcome.skill.cyan(),
                "FAILED".red().bold(),
                detail
            );
        }
        (None, None) => {
            println!("   {:<28} {}", outcome.skill.cyan(), "FAILED".red().bold());
        }
    }
}

fn print_report(report: &SyncReport, dry_run: bool) -> Result<()> {
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }

    for failure in &report.validation_failures {
        println!("   {} validation: {}", "!".yellow(), failure);
    }

    println!();
    if report.outcomes.is_empty() {
        println!("{} No skills matched.", "OK".green().bold());
        return Ok(());
    }

    if report.failed() > 0 {
        println!(
            "{} {} synced, {} failed.",
            "ERROR".red().bold(),
            report.succeeded(),
            report.failed()
        );
        return Err(CliError::user("Synchronization failed"));
    }

    if dry_run {
        println!(
            "{} Dry run: {} skills classified, nothing changed.",
            "OK".green().bold(),
            report.outcomes.len()
        );
    } else if report.unchanged() == report.outcomes.len() {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
    } else {
        println!(
            "{} Synchronized {} skills ({} unchanged).",
            "OK".green().bold(),
            report.succeeded(),
            report.unchanged()
        );
    }
    Ok(())
}

/// Run the sync command
pub fn run_sync(
    catalog: &Path,
    full_history: bool,
    dry_run: bool,
    tier: Option<u8>,
    category: Option<&str>,
    validate: Option<&str>,
) -> Result<()> {
    println!(
        "{} {} skills catalog...",
        "=>".blue().bold(),
        if dry_run { "Classifying" } else { "Synchronizing" }
    );

    let mut engine = engine_for(catalog, full_history);
    if let Some(command_line) = validate
        && let Some(gateway) = CommandGateway::from_command_line(command_line)
    {
        engine = engine.with_gateway(Box::new(gateway));
    }

    let manifest = Manifest::load(&engine.layout().manifest_path())?;
    let filter = SyncFilter {
        tier,
        category: category.map(String::from),
    };
    let options = SyncOptions { dry_run };

    let report = engine.sync(&manifest, &filter, &options)?;
    print_report(&report, dry_run)
}

/// Run the update command
pub fn run_update(catalog: &Path, full_history: bool, name: &str) -> Result<()> {
    println!("{} Updating {}...", "=>".blue().bold(), name.cyan());

    let engine = engine_for(catalog, full_history);
    let manifest = Manifest::load(&engine.layout().manifest_path())?;

    let report = engine.update(&manifest, name)?;
    print_report(&report, false)
}
