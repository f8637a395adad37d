// crates/laptop-daemon/src/main.rs
//
// Binary entrypoint for the laptop catalog daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, seeds the
// user store, and serves LaptopService and AuthService until Ctrl-C.

mod config;
mod seed;
mod tls;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::DaemonConfig;

use laptop_auth::TokenManager;
use laptop_rpc::{LaptopRpcServer, LaptopStores, RpcConfig};
use laptop_store::{DiskImageStore, InMemoryLaptopStore, InMemoryRatingStore, InMemoryUserStore};

/// Laptop catalog daemon: serves the laptop and auth gRPC services.
#[derive(Parser, Debug)]
#[command(name = "laptopd", version = "0.1.0", about = "Laptop catalog gRPC server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "laptopd.toml")]
    config: String,

    /// Port to listen on; overrides the config file.
    #[arg(long)]
    port: Option<u16>,

    /// Serve over mutual TLS; overrides the config file.
    #[arg(long)]
    tls: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config is read before tracing starts so its log level can seed the
    // filter; the outcome is logged right after.
    let loaded = DaemonConfig::load(&args.config);
    let mut daemon_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => DaemonConfig::default(),
    };

    let log_level = daemon_config.log_level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", args.config),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            args.config,
            e
        ),
    }

    if let Some(port) = args.port {
        daemon_config.rpc_port = port;
    }
    if args.tls {
        daemon_config.enable_tls = true;
    }

    tracing::info!("Laptop catalog daemon v0.1.0");
    tracing::info!(
        "RPC endpoint: {}:{}",
        daemon_config.rpc_host,
        daemon_config.rpc_port
    );
    tracing::info!("Image folder: {}", daemon_config.image_folder);

    let users = Arc::new(InMemoryUserStore::new());
    let seeded = seed::seed_users(users.as_ref(), &daemon_config.users)?;
    tracing::info!("Seeded {} users", seeded);

    let tokens = Arc::new(TokenManager::new(
        &daemon_config.secret_key,
        Duration::from_secs(daemon_config.token_duration_secs),
    ));

    let stores = LaptopStores {
        laptops: Arc::new(InMemoryLaptopStore::new()),
        images: Arc::new(DiskImageStore::new(&daemon_config.image_folder)?),
        ratings: Arc::new(InMemoryRatingStore::new()),
    };

    let rpc_config = RpcConfig {
        host: daemon_config.rpc_host.clone(),
        port: daemon_config.rpc_port,
    };
    let mut server = LaptopRpcServer::new(rpc_config, stores, users, tokens);
    if daemon_config.enable_tls {
        server = server.with_tls(tls::load_server_tls(&daemon_config)?);
    }

    server
        .start(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            tracing::info!("Received Ctrl-C, shutting down");
        })
        .await?;

    Ok(())
}
