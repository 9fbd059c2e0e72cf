//! PDI Server - Main entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pdi_common::logging::{init_logging, LogConfig};
use tracing::info;

use pdi_server::{api, config::Config, db::PgStore};

/// Parameter data ingestion server
#[derive(Parser, Debug)]
#[command(name = "pdi-server", version, about)]
struct Args {
    /// Address to bind, overrides PDI_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides PDI_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Defaults for anything the LOG_* variables leave unset
    let log_defaults = LogConfig::builder()
        .log_file_prefix("pdi-server")
        .filter_directives("pdi_server=debug,tower_http=debug,sqlx=warn")
        .build();
    let log_config = LogConfig::from_env(log_defaults)?;

    let _logging_guard = init_logging(&log_config)?;

    info!("Starting PDI Server");

    let mut config = Config::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );
    tracing::debug!(database = ?config.database, "Database settings");

    let store = PgStore::new(config.database.connect_options()?);

    api::serve(config, Arc::new(store)).await
}
