//! Product catalog storefront
//!
//! Server-rendered product list, product detail pages and an add-product form
//! in front of a remote products API.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                 STOREFRONT                    │
//!   Browser request   │  ┌────────┐   ┌──────────┐   ┌────────────┐   │
//!   ──────────────────┼─▶│  http  │──▶│ catalog  │──▶│ generation │   │
//!                     │  │ server │   │ service  │   │ list/detail│   │
//!                     │  └───┬────┘   └────┬─────┘   └─────┬──────┘   │
//!                     │      │             │               │          │
//!                     │      ▼             ▼               ▼          │
//!   HTML response     │  ┌────────┐   ┌──────────────────────────┐    │
//!   ◀─────────────────┼──│ views  │   │   api (ProductClient)    │────┼──▶ Products API
//!                     │  └────────┘   └──────────────────────────┘    │
//!                     │                                               │
//!                     │  config · lifecycle · observability           │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use catalog_storefront::config::watcher::ConfigWatcher;
use catalog_storefront::lifecycle::signals::spawn_signal_handler;
use catalog_storefront::lifecycle::startup::{self, Overrides};
use catalog_storefront::observability::{logging, metrics};
use catalog_storefront::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "catalog-storefront")]
#[command(about = "Server-rendered storefront for a products API", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload generation settings when the config file changes.
    #[arg(long, requires = "config")]
    watch: bool,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `api.base_url`.
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = Overrides {
        bind_address: args.bind,
        api_base_url: args.api_url,
    };

    let config = match startup::load(args.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("catalog-storefront: {e}");
            std::process::exit(2);
        }
    };

    logging::init_tracing(&config.observability);
    tracing::info!("catalog-storefront v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // The watcher must stay alive for events to keep flowing.
    let (config_updates, _watcher) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        _ => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
