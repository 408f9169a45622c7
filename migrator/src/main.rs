use clap::{Parser, Subcommand};
use cluster_migrator::KubernetesServiceMigration;
use cluster_migrator::config::{MigratorConfig, redact_db_url};
use cluster_migrator::selector;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[derive(Parser)]
#[command(
    name = "cluster-migrator",
    about = "Migrate legacy KubernetesService integrations to clusters"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every unmanaged KubernetesService (default)
    Run,
    /// Count unmanaged KubernetesServices without changing anything
    Status,
    /// Reverse the migration (no-op: clusters are never removed)
    Reverse,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Init structured logging (respects RUST_LOG; defaults to info)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match MigratorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "FATAL: {e}. \
                 Set CM_LEGACY_ENCRYPTION_KEY and CM_PLATFORM_ENCRYPTION_KEY \
                 to 64-char hex strings (32 bytes)."
            );
            std::process::exit(1);
        }
    };

    tracing::info!(database = %redact_db_url(&config.database_url), "connecting to database");

    let db = Database::connect(&config.database_url).await?;
    Migrator::up(&db, None).await?;

    tracing::info!("database initialized");

    match cli.command {
        None | Some(Commands::Run) => {
            let migration = KubernetesServiceMigration::new(db, config.keys);
            let report = migration.run().await?;

            println!("{}", serde_json::to_string_pretty(&report)?);

            if let Some(failure) = report.first_failure() {
                eprintln!(
                    "Service {} (project {}) could not be migrated: {}",
                    failure.service_id, failure.project_id, failure.cause
                );
                std::process::exit(1);
            }
        }
        Some(Commands::Status) => {
            let pending = selector::count_unmanaged(&db).await?;
            tracing::info!(pending, "unmanaged KubernetesServices");
            println!("{pending}");
        }
        Some(Commands::Reverse) => {
            KubernetesServiceMigration::new(db, config.keys)
                .reverse()
                .await?;
        }
    }

    Ok(())
}
