//! Coffee Shop CLI - run and maintain the drinks API
//!
//! ```bash
//! coffee-shop serve                 # Start HTTP server (port 5000)
//! coffee-shop init-db               # Drop all drinks, seed the starter menu
//! coffee-shop drinks --detail       # Print the menu as JSON
//! ```

use clap::{Parser, Subcommand};
use coffee_shop::{server::start_server, DrinkStore, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coffee-shop")]
#[command(about = "Coffee shop drinks menu API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Drink store file (default: $DRINKS_DB)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Drop every drink and seed the starter menu
    InitDb {
        /// Drink store file (default: $DRINKS_DB)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Print the menu as JSON
    Drinks {
        /// Drink store file (default: $DRINKS_DB)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Include ingredient names
        #[arg(long)]
        detail: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match ServerConfig::from_env() {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, mut config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve { port, db } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(db) = db {
                config.db_path = db;
            }
            start_server(config).await
        }

        Commands::InitDb { db } => {
            let path = db.unwrap_or(config.db_path);
            let mut store = DrinkStore::open(&path)?;
            store.reset()?;
            eprintln!("Drink store reset: {}", path.display());
            Ok(())
        }

        Commands::Drinks { db, detail } => {
            let store = DrinkStore::open(db.unwrap_or(config.db_path))?;
            let json = if detail {
                let drinks: Vec<_> = store.list().into_iter().map(|d| d.long()).collect();
                serde_json::to_string_pretty(&drinks)?
            } else {
                let drinks: Vec<_> = store.list().into_iter().map(|d| d.short()).collect();
                serde_json::to_string_pretty(&drinks)?
            };
            println!("{}", json);
            Ok(())
        }
    }
}
