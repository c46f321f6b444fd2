// src/bingo_server.rs
// Entry point for the bingo hall API server.

use std::sync::Arc;

use clap::Parser;

use bingo_hall::config::ServerConfig;
use bingo_hall::logging::log_info;
use bingo_hall::server::start_server;
use bingo_hall::store::MemoryStore;

#[derive(Parser)]
#[command(name = "bingo-server", about = "Bingo event hosting API server")]
struct Args {
    /// Host address to bind (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Path to an alternate server config file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Could not load config from {path}: {e}. Using defaults.");
            ServerConfig::default()
        }),
        None => ServerConfig::load_or_default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    log_info("Starting bingo hall server");

    let store = Arc::new(MemoryStore::new());
    let handle = start_server(config, store);

    if let Err(e) = handle.await {
        eprintln!("Server task failed: {e}");
    }
}
