//! itemstore entry point
//!
//! Parses CLI arguments, initializes logging, opens the single shared
//! document store, serves HTTP until ctrl-c, then closes the store.
//! Errors are printed to stderr and exit with non-zero status.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use itemstore::http_server::{HttpServer, HttpServerConfig};
use itemstore::store::DocumentStore;

#[derive(Debug, Parser)]
#[command(name = "itemstore", about = "HTTP CRUD service over a flat JSON-file document store")]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path of the backing store file
    #[arg(long, default_value = "data/db.json")]
    db_path: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = HttpServerConfig {
        host: args.host,
        port: args.port,
        cors_origins: Vec::new(),
        db_path: args.db_path,
    };

    // The one store instance for the whole process, shared by every
    // request handler and torn down after the server drains.
    let store = Arc::new(DocumentStore::open(config.db_path.clone())?);
    info!("application startup complete");

    HttpServer::with_config(store.clone(), config).start().await?;

    store.close()?;
    info!("application shutdown");
    Ok(())
}
