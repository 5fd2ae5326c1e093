//! Submarine swap web service - main entry point

use clap::Parser;
use submarine_web::{build_router, AppState, WebConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "submarine-web")]
#[command(version)]
#[command(about = "Submarine swap web service", long_about = None)]
struct Cli {
    /// HTTP port, overrides the config file
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Path to the JSON config file
    #[arg(long, env = "CONFIG_PATH", default_value = "submarine-web.json")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = WebConfig::load(&cli.config).unwrap_or_else(|e| {
        tracing::warn!(path = %cli.config, error = %e, "Config not loaded, using defaults");
        WebConfig::default()
    });
    if let Some(port) = cli.port {
        config.port = port;
    }

    let addr = config.addr();
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
