//! Active Back Office edge gatekeeper.
//!
//! ```text
//!     Client ──▶ listener ──▶ request id / trace / timeout
//!                                 │
//!                                 ▼
//!                           ┌────────────┐   301 / 400 / 429
//!                           │ gatekeeper │ ──────────────────▶ Client
//!                           └─────┬──────┘
//!                                 │ forward (+ security headers)
//!                                 ▼
//!                             upstream app
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use active_gatekeeper::config;
use active_gatekeeper::error::ServerError;
use active_gatekeeper::lifecycle::{shutdown_signal, Shutdown};
use active_gatekeeper::observability::{logging, metrics};
use active_gatekeeper::HttpServer;

#[derive(Parser)]
#[command(name = "active-gatekeeper")]
#[command(about = "Request-boundary security gatekeeper for Active Back Office", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gatekeeper (default)
    Serve,
    /// Validate configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Serve => {
            logging::init_logging(config.mode, &config.observability);
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                mode = ?config.mode,
                bind_address = %config.listener.bind_address,
                upstream = %config.upstream.address,
                "active-gatekeeper starting"
            );

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.listener.bind_address)
                .await
                .map_err(|source| ServerError::Bind {
                    addr: config.listener.bind_address.clone(),
                    source,
                })?;

            let shutdown = Shutdown::new();
            let server = HttpServer::new(config)?;
            let server_shutdown = shutdown.subscribe();

            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown.trigger();
            });

            server.run(listener, server_shutdown).await?;
            tracing::info!("Shutdown complete");
            Ok(())
        }
    }
}
