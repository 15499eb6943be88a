use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nimbus::api::{create_router, AppState};
use nimbus::config::Config;
use nimbus::db::{Database, DatabaseBackend, LibSqlBackend};
use nimbus::weather::WeatherClient;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(about = "Weather lookup proxy with saved forecast history")]
struct Args {
    /// Override the bind address (NIMBUS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port (PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimbus=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if config.weather.api_key.is_empty() {
        tracing::warn!(
            "WEATHER_API_KEY is not set. Weather lookups will fail until it is configured."
        );
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    tracing::info!(
        "Weather provider: {} ({} forecast days, {}s timeout)",
        config.weather.base_url,
        config.weather.forecast_days,
        config.weather.timeout_secs
    );
    let weather = WeatherClient::new(&config.weather)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db.clone(), weather);
    let app = create_router(state);

    tracing::info!("Server is running on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  API docs:     http://{}/api/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.close().await {
        tracing::error!("Failed to close database: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
