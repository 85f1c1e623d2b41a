//! hopr-admin: operator CLI for a running hoprd node.
//!
//! Talks to the node's HTTP API under `/api/v3`.

mod api_client;
mod commands;
mod output;

use clap::{Parser, Subcommand};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// hopr-admin: diagnostics for a HOPR node.
#[derive(Parser)]
#[command(name = "hopr-admin", version, about)]
struct Cli {
    /// Output in JSON format (no colors, machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the node's HTTP API.
    #[arg(long, global = true, default_value = "http://127.0.0.1:3001")]
    api_endpoint: String,

    /// API token sent with every request.
    #[arg(long, global = true)]
    api_token: Option<String>,

    /// Request and ping timeout in seconds.
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping a peer by peer id or alias.
    Ping {
        /// Peer id or alias of the node to ping.
        address: Option<String>,
    },
    /// Show node information.
    Info,
    /// Show native and HOPR balances.
    Balances,
    /// List aliases known to the node.
    Aliases,
}

// ---------------------------------------------------------------------------
// Global options passed to every command handler
// ---------------------------------------------------------------------------

/// Shared options threaded into command handlers.
pub struct GlobalOpts {
    pub json: bool,
    pub api_endpoint: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let opts = GlobalOpts {
        json: cli.json,
        api_endpoint: cli.api_endpoint,
        api_token: cli.api_token,
        timeout_secs: cli.timeout,
    };

    let result = dispatch(&opts, cli.command).await;

    if let Err(e) = result {
        output::print_error(&e, opts.json);
        std::process::exit(1);
    }
}

async fn dispatch(opts: &GlobalOpts, cmd: Commands) -> std::result::Result<(), String> {
    match cmd {
        Commands::Ping { address } => commands::ping::run(address, opts).await,
        Commands::Info => commands::node::info(opts).await,
        Commands::Balances => commands::account::balances(opts).await,
        Commands::Aliases => commands::node::aliases(opts).await,
    }
}
