//! Seedwall server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin seedwall-server
//! cargo run --bin seedwall-server -- --host 0.0.0.0 --port 3000 --seed-secret letmein
//! ```

use clap::Parser;
use seedwall_server::{ServerConfig, build_server};
use seedwall_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger("seedwall_server", env!("CARGO_BIN_NAME"), &config.log_level);
    tracing::debug!("Configuration: {:?}", config);

    let server = match build_server(&config).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
