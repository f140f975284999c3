//! Item registry service entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use item_registry::api::docs::openapi_document;
use item_registry::api::{create_router, AppState};
use item_registry::config::Config;
use item_registry::metrics;
use item_registry::utils::shutdown_signal;

/// In-memory item registry HTTP service.
#[derive(Parser, Debug)]
#[command(name = "item-registry")]
#[command(about = "HTTP microservice with a health check and an in-memory items resource")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,

    /// Print the OpenAPI document as JSON.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    // Initialize logging
    init_logging(&config, args.verbose);

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Openapi) => cmd_openapi(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("item_registry=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let json = config.log_json;
    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(filter)
        .init();
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("ITEM REGISTRY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  App Name: {}", config.app_name);
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    println!("  Listen: {}:{}", config.host, config.port);
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!(
        "  Metrics: {}",
        if config.metrics_enabled { "Enabled" } else { "Disabled" }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the OpenAPI document.
fn cmd_openapi(config: &Config) -> anyhow::Result<()> {
    println!("{}", openapi_document(&config.app_name).to_pretty_json()?);
    Ok(())
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!(
        app = %config.app_name,
        version = env!("CARGO_PKG_VERSION"),
        "Configuration loaded successfully"
    );

    // Create app state
    let mut app_state = AppState::new().with_app_name(config.app_name.clone());
    let upkeep = if config.metrics_enabled {
        let handle = metrics::install_recorder()?;
        let upkeep = metrics::spawn_upkeep(handle.clone(), metrics::UPKEEP_INTERVAL);
        app_state = app_state.with_metrics(handle);
        Some(upkeep)
    } else {
        None
    };

    // Start HTTP server
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(upkeep) = upkeep {
        upkeep.abort();
    }
    info!("Server stopped");
    Ok(())
}
