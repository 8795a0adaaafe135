//! Binary entry point for clubroster.
//!
//! Command-line front-end over the personnel and call-up services.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use clubroster::config::RosterConfig;
use clubroster::io::Format;
use clubroster::observability;
use clubroster::{CallUpService, Personnel, PersonnelService, Role, SqliteStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Clubroster - football club personnel and call-up manager.
#[derive(Parser)]
#[command(name = "clubroster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database, overriding the configuration.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Import personnel from a CSV, JSON or XML file.
    Import {
        /// File to read.
        path: PathBuf,

        /// Format (csv, json, xml); detected from the extension by default.
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// Export every stored record to a file.
    Export {
        /// File to write.
        path: PathBuf,

        /// Format (csv, json, xml); detected from the extension by default.
        #[arg(short, long)]
        format: Option<Format>,
    },

    /// List stored personnel.
    List,

    /// Show one record.
    Show {
        /// Record identifier.
        id: i64,
    },

    /// Delete one record.
    Delete {
        /// Record identifier.
        id: i64,
    },

    /// Inspect match call-ups.
    CallUp {
        /// Call-up subcommand.
        #[command(subcommand)]
        action: CallUpAction,
    },
}

/// Call-up subcommands.
#[derive(Subcommand)]
enum CallUpAction {
    /// Check the roster composition of a stored call-up.
    Check {
        /// Call-up identifier.
        id: i64,
    },
}

fn main() -> ExitCode {
    // A missing .env file is not an error
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.database.clone()) {
        Ok(config) => {
            let logging = config.logging.clone().verbose(cli.verbose);
            config.with_logging(logging)
        },
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Loads the configuration file (explicit or default) and applies overrides.
fn load_config(path: Option<&Path>, database: Option<PathBuf>) -> anyhow::Result<RosterConfig> {
    let config = match path {
        Some(path) => RosterConfig::load_from_file(path)?,
        None => RosterConfig::load_default()?,
    };
    let config = config.with_env_overrides()?;

    Ok(match database {
        Some(database) => config.with_database_path(database),
        None => config,
    })
}

/// Runs the selected command.
fn run_command(command: Commands, config: &RosterConfig) -> anyhow::Result<()> {
    let store = Arc::new(SqliteStore::new(&config.database_path).with_context(|| {
        format!("cannot open database {}", config.database_path.display())
    })?);

    match command {
        Commands::Import { path, format } => {
            let service = PersonnelService::with_store(store, config)?;
            cmd_import(&service, &path, format)
        },
        Commands::Export { path, format } => {
            let service = PersonnelService::with_store(store, config)?;
            let result = service
                .export_to_file(&path, format)
                .with_context(|| format!("export to {} failed", path.display()))?;
            println!(
                "Exported {} records as {} to {}",
                result.exported,
                result.format,
                result.path.display()
            );
            Ok(())
        },
        Commands::List => {
            let service = PersonnelService::with_store(store, config)?;
            for record in service.get_all()? {
                println!("{}", summary(&record));
            }
            Ok(())
        },
        Commands::Show { id } => {
            let service = PersonnelService::with_store(store, config)?;
            let record = service.get_by_id(id)?;
            print_record(&record);
            Ok(())
        },
        Commands::Delete { id } => {
            let service = PersonnelService::with_store(store, config)?;
            let removed = service.delete(id)?;
            println!("Deleted {}", summary(&removed));
            Ok(())
        },
        Commands::CallUp {
            action: CallUpAction::Check { id },
        } => {
            let service = CallUpService::with_stores(store.clone(), store, config)?;
            let call_up = service.get_by_id(id)?;
            match service.validate_composition(&call_up) {
                Ok(()) => println!("Call-up {id} ({}) is complete", call_up.description),
                Err(e) => println!("Call-up {id} ({}) is not valid: {e}", call_up.description),
            }
            Ok(())
        },
    }
}

fn cmd_import(
    service: &PersonnelService,
    path: &Path,
    format: Option<Format>,
) -> anyhow::Result<()> {
    let result = service
        .import_from_file(path, format)
        .with_context(|| format!("import from {} failed", path.display()))?;

    println!(
        "Imported {} of {} records ({})",
        result.imported, result.total_processed, result.format
    );
    for error in &result.errors {
        println!("  skipped: {error}");
    }
    Ok(())
}

/// One-line description of a record.
fn summary(record: &Personnel) -> String {
    let detail = match &record.role {
        Role::Player(profile) => format!("#{} {}", profile.shirt_number, profile.position),
        Role::Coach(profile) => profile.specialization.to_string(),
    };
    format!(
        "{:>5}  {:<30} {:<10} {detail}",
        record.id,
        record.full_name(),
        record.role.discriminator()
    )
}

fn print_record(record: &Personnel) {
    println!("Id:          {}", record.id);
    println!("Name:        {}", record.full_name());
    println!("Role:        {}", record.role.discriminator());
    println!("Born:        {}", record.birth_date);
    println!("Joined:      {}", record.join_date);
    println!("Salary:      {:.2}", record.salary);
    println!("Country:     {}", record.country);
    match &record.role {
        Role::Player(profile) => {
            println!("Position:    {}", profile.position);
            println!("Shirt:       {}", profile.shirt_number);
            println!("Height:      {:.2} m", profile.height);
            println!("Weight:      {:.1} kg", profile.weight);
            println!("Goals:       {}", profile.goals);
            println!("Matches:     {}", profile.matches_played);
        },
        Role::Coach(profile) => println!("Speciality:  {}", profile.specialization),
    }
    if !record.image_ref.is_empty() {
        println!("Image:       {}", record.image_ref);
    }
}
