use sqlx::postgres::PgPoolOptions;
use tracing::info;

use products_service::{bootstrap, config::Config, db, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_lazy(&config.database_url)?;

    bootstrap::wait_for_database(&pool, config.db_wait_max_attempts, config.db_wait_delay).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let summary = seed::seed_products(&pool).await?;
    let total = db::count_products(&pool).await?;

    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        total,
        "Sample data loaded"
    );

    Ok(())
}
