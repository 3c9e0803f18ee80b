use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mission_control::catalog::{CatalogSyncService, DEFAULT_CATALOG_URL};
use mission_control::ingest::CsvIngestionPipeline;
use mission_control::{api, db};

#[derive(Parser)]
#[command(name = "mission-control")]
#[command(about = "Launch scheduling and habitable-planet tracking server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Mission Control server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Planet candidate dataset to classify at startup
        #[arg(long, default_value = "data/koi_table.csv")]
        planets_file: PathBuf,

        /// Remote launch catalog query endpoint
        #[arg(long, default_value = DEFAULT_CATALOG_URL)]
        catalog_url: String,

        /// Database file (defaults to the platform data directory)
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "mission_control=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let (port, planets_file, catalog_url, db_path) = match cli.command {
        Some(Commands::Serve {
            port,
            planets_file,
            catalog_url,
            db_path,
        }) => (port, planets_file, catalog_url, db_path),
        None => (
            8000,
            PathBuf::from("data/koi_table.csv"),
            DEFAULT_CATALOG_URL.to_string(),
            None,
        ),
    };

    let db = match db_path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    // Bootstrap order matters: planets must exist before launches can target
    // them, and a catalog failure is fatal before the listener binds.
    CsvIngestionPipeline::new(db.clone()).run(&planets_file)?;
    CatalogSyncService::new(db.clone(), catalog_url).load().await?;

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Mission Control server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
