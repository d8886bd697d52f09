use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use taskhub_api::auth::TokenCodec;
use taskhub_api::config::AppConfig;
use taskhub_api::database::{DatabaseManager, PgStore};
use taskhub_api::queue::RedisEmailQueue;
use taskhub_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    taskhub_api::init_tracing();

    let config = AppConfig::from_env();
    info!("Starting TaskHub API in {:?} mode", config.environment);

    let codec = TokenCodec::from_config(&config.security).context("JWT_SECRET must be set to start the server")?;
    let pool = DatabaseManager::connect_lazy(&config.database).context("cannot build database pool")?;
    let queue = RedisEmailQueue::new(&config.mail.redis_url, &config.mail.queue_name)
        .context("cannot open the email queue")?;

    let port = config.api.port;
    let state = AppState::new(Arc::new(PgStore::new(pool)), Some(codec), Arc::new(queue), config);
    let app = router(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("TaskHub API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
