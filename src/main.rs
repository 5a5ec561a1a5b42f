//! Parking service binary
//!
//! ```sh
//! # Run with default config (~/.config/parking-service/config.toml)
//! parking-service
//!
//! # Custom config path and port
//! parking-service --config /etc/parking-service/config.toml --port 8081
//!
//! # Validate config without starting
//! parking-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parking_service::config::AppConfig;
use parking_service::server::{init_tracing, ServerHandle, ServerOptions};

/// REST service for booking parking spots in residential communities.
#[derive(Parser, Debug)]
#[command(
    name = "parking-service",
    version,
    about = "Residential parking booking service",
    long_about = "REST API for booking parking spots in residential communities.\n\n\
                  Default config: ~/.config/parking-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PARKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(parking_service::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // CLI overrides come before tracing so --log-level takes effect.
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        return match loaded {
            Ok(_) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {}", config.logging.level);
                println!(
                    "   Page size   : {} (max {})",
                    config.pagination.default_page_size, config.pagination.max_page_size
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid configuration in {}: {}", config_path.display(), e);
                Err(e.into())
            }
        };
    }

    init_tracing(&config);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
