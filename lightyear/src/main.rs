use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lightyear::api::{create_router, AppState};
use lightyear::config::Config;

#[derive(Parser)]
#[command(name = "lightyear")]
#[command(about = "Document-aware chat assistant backed by Gemini")]
struct Args {
    /// Port to listen on (overrides LIGHTYEAR_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Host to bind (overrides LIGHTYEAR_HOST)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lightyear=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    if config.llm.api_key.is_none() {
        tracing::warn!(
            "GEMINI_API_KEY is not set. Model calls will be sent unauthenticated and fail upstream."
        );
    }
    tracing::info!("Using model {} at {}", config.llm.model, config.llm.base_url);

    let state = AppState::new(config.clone())?;

    tracing::info!(
        "Starting session sweeper... (max_sessions={}, idle_ttl={}s)",
        config.sessions.max_sessions,
        config.sessions.idle_ttl_secs
    );
    let sessions = state.sessions.clone();
    let sweep_interval = config.sessions.sweep_interval_secs.max(1);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(sweep_interval)).await;
            sessions.sweep_idle().await;
        }
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Lightyear starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  API docs:     http://{}/api/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

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

    tracing::info!("Shutdown signal received");
}
