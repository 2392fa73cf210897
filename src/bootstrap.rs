use std::time::Duration;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, warn};

/// Blocks until `SELECT 1` succeeds, retrying up to `max_attempts` times.
pub async fn wait_for_database(
    pool: &PgPool,
    max_attempts: u32,
    delay: Duration,
) -> anyhow::Result<()> {
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => {
                info!(attempt, "Database is ready");
                return Ok(());
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %e,
                    "Database not available yet, retrying in {:.1}s",
                    delay.as_secs_f64()
                );
                last_error = Some(e);
                if attempt < max_attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    let err = match last_error {
        Some(e) => anyhow!(e),
        None => anyhow!("no connection attempts were made"),
    };
    Err(err.context(format!(
        "could not connect to the database after {} attempts",
        max_attempts
    )))
}
