//! Administrative command line for the gomi waste-sorting catalog.
//!
//! Covers the jobs the catalog needs outside its request path: seeding a
//! fresh database, snapshot export/import, and quick schedule or reverse
//! search queries from a shell.

#![allow(
    clippy::print_stdout,
    reason = "command line tool reports results on stdout"
)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gomi_core::days::{SPECIAL_DAY_FORMAT, Weekday};
use gomi_core::model::Category;
use gomi_core::seed::default_snapshot;
use gomi_core::snapshot::SnapshotDocument;
use gomi_store::{CatalogStore, GomiService, ImportPolicy, ImportReport, SearchOutcome};

#[derive(Parser)]
#[command(name = "gomi", version, about = "Household waste-sorting catalog administration")]
struct Cli {
    /// Path to the catalog database (defaults to $GOMI_DB, then gomi.db).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the database from a snapshot file or the bundled sample catalog.
    Init {
        /// Snapshot file to seed from instead of the bundled sample.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Clear the existing catalog first instead of skipping known names.
        #[arg(long)]
        replace: bool,
    },
    /// Write the catalog snapshot as JSON to a file or stdout.
    Export {
        /// Output file; omit to print to stdout.
        file: Option<PathBuf>,
    },
    /// Apply a snapshot file to the catalog.
    Import {
        /// Snapshot file to apply.
        file: PathBuf,
        /// Clear the existing catalog first instead of skipping known names.
        #[arg(long)]
        replace: bool,
    },
    /// List all categories with their garbage types.
    List,
    /// Show what is collected today.
    Today,
    /// Show what is collected on the given weekday (e.g. Monday).
    Day {
        /// Weekday literal, case-sensitive English name.
        weekday: String,
    },
    /// Find the owning category for a garbage item by (partial) name.
    Search {
        /// Item name fragment.
        query: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = cli
        .db
        .or_else(|| env::var_os("GOMI_DB").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("gomi.db"));

    let store = CatalogStore::open(&db_path)
        .with_context(|| format!("opening catalog database {}", db_path.display()))?;
    info!(db = %db_path.display(), "catalog database opened");
    let service = GomiService::new(Arc::new(store));

    match cli.command {
        Command::Init { file, replace } => {
            let doc = match file {
                Some(path) => read_snapshot(&path)?,
                None => default_snapshot(),
            };
            let report = service.import(&doc, policy_for(replace))?;
            print_report(&report)?;
        }
        Command::Export { file } => {
            let text = service.export()?.to_json_string()?;
            match file {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("writing snapshot to {}", path.display()))?;
                    println!("exported catalog to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        Command::Import { file, replace } => {
            let doc = read_snapshot(&file)?;
            let report = service.import(&doc, policy_for(replace))?;
            print_report(&report)?;
        }
        Command::List => {
            let categories = service.categories()?;
            if categories.is_empty() {
                println!("catalog is empty; run `gomi init` to seed it");
            }
            for category in &categories {
                print_category(category);
            }
        }
        Command::Today => {
            let schedule = service.today()?;
            println!("today is {}", schedule.day);
            print_day_result(&schedule.categories);
        }
        Command::Day { weekday } => {
            let day = weekday.parse::<Weekday>()?;
            let categories = service.by_day(Some(day))?;
            print_day_result(&categories);
        }
        Command::Search { query } => match service.find_by_name(&query)? {
            SearchOutcome::Found(hits) => {
                for hit in hits {
                    println!(
                        "{} -> {} ({})",
                        hit.garbage_type.name,
                        hit.category.name,
                        hit.category
                            .days
                            .iter()
                            .map(|day| day.name())
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
            }
            SearchOutcome::NotFound => {
                println!("no garbage type matches \"{query}\"");
            }
        },
    }

    Ok(())
}

fn policy_for(replace: bool) -> ImportPolicy {
    if replace {
        ImportPolicy::ReplaceAll
    } else {
        ImportPolicy::MergeSkipExisting
    }
}

fn read_snapshot(path: &Path) -> Result<SnapshotDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot file {}", path.display()))?;
    Ok(SnapshotDocument::from_json_str(&text)?)
}

fn print_report(report: &ImportReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_day_result(categories: &[Category]) {
    if categories.is_empty() {
        println!("nothing is collected");
        return;
    }
    for category in categories {
        print_category(category);
    }
}

fn print_category(category: &Category) {
    let days = category
        .days
        .iter()
        .map(|day| day.name())
        .collect::<Vec<_>>()
        .join(", ");
    println!("[{}] {} on {}", category.id.0, category.name, days);
    println!("    method: {}", category.method);
    if !category.special_days.is_empty() {
        let special = category
            .special_days
            .iter()
            .map(|day| day.format(SPECIAL_DAY_FORMAT).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("    special days: {special}");
    }
    if let Some(notion) = &category.notion {
        println!("    note: {notion}");
    }
    if !category.types.is_empty() {
        let types = category
            .types
            .iter()
            .map(|garbage_type| garbage_type.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("    types: {types}");
    }
}
