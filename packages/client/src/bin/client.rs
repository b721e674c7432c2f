//! Seedwall terminal client.
//!
//! Runs either as a screen display (peer) or as the seed console that picks
//! what every screen shows. Reconnects automatically after losing the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin seedwall-client -- peer --screen 3
//! cargo run --bin seedwall-client -- seed --secret letmein
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};

use seedwall_client::{
    runner::{ReconnectPolicy, run_with_reconnect},
    session::{SeedOptions, run_peer_session, run_seed_session, spawn_readline},
};
use seedwall_shared::logger::setup_logger;

const DEFAULT_WS_URL: &str = "ws://127.0.0.1:3000/ws";

#[derive(Parser, Debug)]
#[command(name = "seedwall-client")]
#[command(about = "Terminal client for a Seedwall server", long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Seconds to wait before reconnecting
    #[arg(long, default_value_t = 2)]
    reconnect_interval_secs: u64,

    /// Maximum reconnect attempts (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_reconnects: u32,

    /// Seconds of server silence before the connection is treated as lost
    /// (the server pings every 30 seconds by default)
    #[arg(long, default_value_t = 90)]
    idle_timeout_secs: u64,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Display the demos routed to one screen
    Peer {
        /// Screen number to register (1-99)
        #[arg(short = 's', long)]
        screen: i64,

        /// WebSocket server URL
        #[arg(short = 'u', long, default_value = DEFAULT_WS_URL)]
        url: String,
    },
    /// Control the wall from an interactive console
    Seed {
        /// Shared secret, when the server requires one
        #[arg(long, env = "SEEDWALL_SEED_SECRET")]
        secret: Option<String>,

        /// HTTP root of the server, used to read the catalog
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        api: String,

        /// WebSocket server URL
        #[arg(short = 'u', long, default_value = DEFAULT_WS_URL)]
        url: String,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger("seedwall_client", env!("CARGO_BIN_NAME"), &args.log_level);

    let policy = ReconnectPolicy {
        interval: Duration::from_secs(args.reconnect_interval_secs),
        max_reconnects: args.max_reconnects,
    };

    let idle_timeout = Duration::from_secs(args.idle_timeout_secs);

    let result = match args.mode {
        Mode::Peer { screen, url } => {
            let session = run_with_reconnect(policy, async || {
                run_peer_session(&url, screen, idle_timeout).await
            });
            tokio::select! {
                result = session => result,
                _ = tokio::signal::ctrl_c() => Ok(()),
            }
        }
        Mode::Seed { secret, api, url } => {
            let options = SeedOptions {
                url,
                api_base: api,
                secret,
                idle_timeout,
            };
            // The readline thread outlives individual connections
            let mut input = spawn_readline();
            run_with_reconnect(policy, async || {
                run_seed_session(&options, &mut input).await
            })
            .await
        }
    };

    if let Err(e) = result {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
