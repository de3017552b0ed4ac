use anyhow::Context;
use dotenvy::dotenv;
use edumarket::config::ServerConfig;
use edumarket::edumarket_db::{DbConfig, init_db_pool, run_migrations};
use edumarket::logging::{init_tracing, shutdown_tracer};
use edumarket::metrics::{init_metrics, metrics_app};
use edumarket::router::init_router;
use edumarket::state::AppState;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let server_config = ServerConfig::from_env();
    let db_config = DbConfig::from_env().context("DATABASE_URL must be set")?;

    let db = init_db_pool(&db_config)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    if let Some(handle) = init_metrics() {
        let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
        tokio::spawn(async move {
            match tokio::net::TcpListener::bind(&metrics_addr).await {
                Ok(listener) => {
                    info!("Metrics server listening on http://{}/metrics", metrics_addr);
                    if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                        error!("Metrics server error: {}", e);
                    }
                }
                Err(e) => error!("Failed to bind metrics server on {}: {}", metrics_addr, e),
            }
        });
    }

    let state = AppState::from_env(db.clone());
    let app = init_router(state);

    let addr = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("📚 Swagger UI available at http://{}/swagger-ui", addr);
    info!("📖 Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Database pool closed");
    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, draining connections");
}
