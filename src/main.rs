use std::sync::Arc;

use alumnet_api::config;
use alumnet_api::database::{manager, repository::Repositories};
use alumnet_api::realtime::BroadcastPublisher;
use alumnet_api::routes;
use alumnet_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Alumnet API in {:?} mode", config.environment);

    let pool = manager::connect().await?;
    manager::migrate(&pool).await?;

    let repos = Repositories::postgres(pool);
    let publisher = Arc::new(BroadcastPublisher::new(256));
    let app = routes::app(AppState::new(repos, publisher));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!("Alumnet API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
