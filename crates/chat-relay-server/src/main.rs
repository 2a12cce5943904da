use anyhow::Result;
use chat_relay_server::{build_router, config::Settings, AppState};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,chat_relay_server=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting chat relay server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");
    if settings.openai.api_key.is_none() {
        info!("OPENAI_API_KEY not set, /api/chatbot will fail until it is provided");
    }

    // Store + backend adapters
    let state = AppState::from_settings(&settings)?;
    info!(
        "✅ Backends ready: openai={}, ollama={}, rag={}",
        settings.openai.base_url, settings.ollama.base_url, settings.rag.base_url
    );

    let static_dir = settings.static_dir();
    let app = build_router(state, static_dir.as_deref());

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
