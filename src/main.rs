use std::sync::Arc;

use dishmap::config::Config;
use dishmap::routes::create_router;
use dishmap::services::sink::MemorySink;
use dishmap::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let sink = Arc::new(MemorySink::new(config.event_buffer));
    let state = AppState::new(sink);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Event collector listening");
    axum::serve(listener, app).await?;

    Ok(())
}
