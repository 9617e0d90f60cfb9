//! # Command Line Interface
//!
//! Runs the API server (the default), manages the database schema, and
//! provisions users with bearer tokens.

pub mod user;

use crate::api::start_api_server;
use crate::config::{AppConfig, DatabaseConfig, ObservabilityConfig};
use crate::observability::{init_logging, init_observability, log_config_info, logging::env_filter};
use crate::storage::{
    create_pool, get_migration_version, list_applied_migrations, run_migrations,
    validate_migrations, MigrationInfo,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "formkeeper")]
#[command(about = "Form management API server and tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database URL override
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve,

    /// Database management commands
    Database {
        #[command(subcommand)]
        command: DatabaseCommands,
    },

    /// User administration commands
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },
}

#[derive(Subcommand)]
pub enum DatabaseCommands {
    /// Run pending migrations
    Migrate,

    /// List all applied migrations
    List,

    /// Validate database schema
    Validate,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(cli.database_url, cli.verbose).await?,
        Commands::Database { command } => {
            initialise_logging(cli.verbose)?;
            let database = database_config(cli.database_url);
            handle_database_command(command, &database).await?
        }
        Commands::User { command } => {
            initialise_logging(cli.verbose)?;
            let database = database_config(cli.database_url);
            user::handle_user_command(command, &database).await?
        }
    }

    Ok(())
}

fn database_config(url_override: Option<String>) -> DatabaseConfig {
    let mut database = DatabaseConfig::from_env();
    if let Some(url) = url_override {
        database.url = url;
    }
    database
}

async fn serve(url_override: Option<String>, verbose: bool) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(url) = url_override {
        config.database.url = url;
        config.validate()?;
    }
    if verbose {
        config.observability.log_level = "debug".to_string();
    }

    init_observability(&config.observability).await?;
    info!(app_name = crate::APP_NAME, version = crate::VERSION, "Starting formkeeper");
    log_config_info(&config);

    let pool = create_pool(&config.database).await?;
    start_api_server(config.api.clone(), pool).await?;
    Ok(())
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let config = ObservabilityConfig {
        log_level: if verbose { "debug" } else { "warn" }.to_string(),
        ..ObservabilityConfig::from_env()
    };

    // A bad filter is a user error; an installed subscriber is not.
    env_filter(&config)?;
    if let Err(err) = init_logging(&config) {
        debug!(error = %err, "global subscriber already installed, keeping it");
    }
    Ok(())
}

/// Handle database management commands
async fn handle_database_command(
    command: DatabaseCommands,
    config: &DatabaseConfig,
) -> anyhow::Result<()> {
    let config = DatabaseConfig { auto_migrate: false, ..config.clone() };
    let pool = create_pool(&config).await?;

    match command {
        DatabaseCommands::Migrate => {
            println!("Running database migrations...");
            run_migrations(&pool).await?;
            println!("Migrations completed successfully!");
        }

        DatabaseCommands::List => {
            let migrations = list_applied_migrations(&pool).await?;
            if migrations.is_empty() {
                println!("No migrations have been applied");
            } else {
                println!("Schema version: {}", get_migration_version(&pool).await?);
                println!("Applied migrations:");
                print_migrations_table(&migrations);
            }
        }

        DatabaseCommands::Validate => {
            println!("Validating database schema...");
            if validate_migrations(&pool).await? {
                println!("Database schema validation passed");
            } else {
                anyhow::bail!("Database schema validation failed");
            }
        }
    }

    Ok(())
}

/// Print migrations in a formatted table
fn print_migrations_table(migrations: &[MigrationInfo]) {
    println!();
    println!("{:<15} {:<50} {:<25} {:<10}", "Version", "Description", "Applied On", "Time (ms)");
    println!("{}", "-".repeat(100));

    for migration in migrations {
        println!(
            "{:<15} {:<50} {:<25} {:<10}",
            migration.version,
            truncate_string(&migration.description, 48),
            migration.installed_on.format("%Y-%m-%d %H:%M:%S"),
            migration.execution_time
        );
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
