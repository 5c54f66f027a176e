use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use folio_cli::config::Config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - book content store and editor API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP API
    Serve {
        /// API server port (overrides FOLIO_API_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides FOLIO_API_HOST)
        #[arg(long)]
        host: Option<IpAddr>,
        /// SQLite database file (overrides FOLIO_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Apply database migrations and exit
    Migrate {
        /// SQLite database file (overrides FOLIO_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            database,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            config.validate()?;

            folio_cli::run_server(config).await?;
        }
        Commands::Migrate { database } => {
            if let Some(database) = database {
                config.database_path = database;
            }

            folio_cli::run_migrations(&config).await?;
        }
    }

    Ok(())
}
