// ABOUTME: Server binary: loads configuration, opens the database and serves HTTP
// ABOUTME: Command-line flags override the matching environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

//! # Online Academy server
//!
//! ```bash
//! # Serve on the configured port
//! cargo run --bin academy-server
//!
//! # Override port and database
//! cargo run --bin academy-server -- --port 8080 --database-url sqlite:./data/dev.db
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use online_academy::config::environment::ServerConfig;
use online_academy::database::Database;
use online_academy::errors::AppResult;
use online_academy::logging;
use online_academy::resources::ServerResources;
use online_academy::server::AcademyServer;

#[derive(Parser)]
#[command(
    name = "academy-server",
    about = "Online Academy web server",
    long_about = "Serve the Online Academy course marketplace over HTTP"
)]
struct Args {
    /// Listen port override
    #[arg(long)]
    port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    logging::init(config.log_format, &args.log_level)?;
    info!("Starting Online Academy: {}", config.summary());

    let database = Database::with_config(&config.database).await?;
    let resources = Arc::new(ServerResources::new(database, Arc::new(config))?);

    AcademyServer::new(resources).run().await
}
