//! Split-Game Backend Binary
//!
//! Serves the split-payment ledger on BIND_ADDR (e.g. 0.0.0.0:5000).
//! Set DB_URL to keep games in PostgreSQL; without it they live in memory.

use clap::Parser;

#[tokio::main]
async fn main() {
    tsp_core::log();
    tsp_core::kys();
    let config = tsp_server::Config::parse();
    if let Err(e) = tsp_server::run(config).await {
        log::error!("server stopped: {:#}", e);
        std::process::exit(1);
    }
}
