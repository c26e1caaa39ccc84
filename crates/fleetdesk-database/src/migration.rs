//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use fleetdesk_core::error::{AppError, ErrorKind};

/// Apply any migrations not yet recorded in the database.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Applying pending migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
        })?;

    info!("Schema is up to date");
    Ok(())
}
