use sqlx::postgres::PgPoolOptions;
use tracing::info;

use products_service::{bootstrap, build_router, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,products_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Products service starting");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_lazy(&config.database_url)?;

    info!("Waiting for PostgreSQL...");
    bootstrap::wait_for_database(&pool, config.db_wait_max_attempts, config.db_wait_delay).await?;

    info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations complete.");

    let state = AppState::new(pool, config.static_base_url.as_str());
    let app = build_router(state, Some(&config.static_dir));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);
    info!(
        static_dir = %config.static_dir.display(),
        static_base_url = %config.static_base_url,
        "Serving product images"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
