//! Skillsync CLI
//!
//! The command-line interface for synchronizing a skills catalog against
//! its upstream sources.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, &cli.catalog, cli.full_history),
        None => {
            println!("{} Skills catalog synchronizer", "skillsync".green().bold());
            println!();
            println!(
                "Run {} for available commands.",
                "skillsync --help".cyan()
            );
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, catalog: &std::path::Path, full_history: bool) -> Result<()> {
    match cmd {
        Commands::Sync {
            dry_run,
            tier,
            category,
            validate,
        } => commands::run_sync(
            catalog,
            full_history,
            dry_run,
            tier,
            category.as_deref(),
            validate.as_deref(),
        ),
        Commands::Update { name } => commands::run_update(catalog, full_history, &name),
        Commands::ListExternal => commands::run_list_external(catalog),
        Commands::ListLocal => commands::run_list_local(catalog),
        Commands::ListCategories => commands::run_list_categories(catalog),
        Commands::Status { json } => commands::run_status(catalog, json),
        Commands::Diff { skill } => commands::run_diff(catalog, full_history, skill.as_deref()),
    }
}
