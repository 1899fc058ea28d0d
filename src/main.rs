mod common;
mod config;
mod export;
mod reconcile;

mod database;
mod server;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long, default_value = "procura.db")]
        database: String,
        #[clap(long)]
        cors_origin: Option<String>,
        /// Optional YAML config; flags override file values
        #[clap(short, long)]
        config: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    Import {
        #[clap(short, long, default_value = "procura.db")]
        database: String,
        /// Project the rows belong to (not needed for the items master)
        #[clap(short, long)]
        project: Option<i32>,
        /// One of: items, project-items, options
        kind: String,
        file: String,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init {
        #[clap(short, long, default_value = "procura.db")]
        database: String,
        /// Create the worked example project after migrating
        #[clap(long)]
        seed: bool,
    },
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
        #[clap(short, long, default_value = "procura.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Serve {
            port,
            database,
            cors_origin,
            config,
        } => {
            let file_config = match config {
                Some(path) => config::ServerConfig::load(&path)?,
                None => config::ServerConfig::default(),
            };
            let port = file_config.port.filter(|_| port == 3000).unwrap_or(port);
            let database = file_config
                .database
                .filter(|_| database == "procura.db")
                .unwrap_or(database);
            let cors_origin = cors_origin.or(file_config.cors_origin);

            info!("Starting server on port {}", port);
            server::start_server(port, &database, cors_origin.as_deref()).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init { database, seed } => {
                info!("Initializing database: {}", database);
                server::migrate_database(&database, server::MigrateDirection::Up).await?;
                if seed {
                    let url = database::get_database_url(Some(&database));
                    let db = database::establish_connection(&url).await?;
                    database::seed_data::create_example_project(&db).await?;
                }
            }
            DbCommands::Migrate {
                direction,
                database,
            } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&database, direction).await?;
            }
        },
        Commands::Import {
            database,
            project,
            kind,
            file,
        } => {
            info!("Importing {} from {}", kind, file);
            let url = database::get_database_url(Some(&database));
            let db = database::establish_connection(&url).await?;
            database::setup_database(&db).await?;

            let csv_text = std::fs::read_to_string(&file)?;
            let service = services::ImportService::new(db);
            let report = service.import(project, &kind, &csv_text).await?;

            info!("Imported {} rows", report.imported);
            for skipped in &report.skipped {
                info!("Skipped: {}", skipped);
            }
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
