use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tessera_core::AppError;
use tessera_infrastructure::MIGRATOR;
use tracing::info;

use crate::api_config::ApiConfig;

pub async fn connect_and_migrate(config: &ApiConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!(
        max_connections = config.database_max_connections,
        acquire_timeout_seconds = config.database_acquire_timeout.as_secs(),
        "database pool ready"
    );

    Ok(pool)
}
