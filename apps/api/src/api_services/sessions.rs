use sqlx::PgPool;
use tessera_core::AppError;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

const SESSION_TABLE: &str = "access_sessions";
const SESSION_INACTIVITY_MINUTES: i64 = 30;

/// Cookie sessions persisted next to the access-control tables.
pub async fn build_postgres_session_layer(
    pool: PgPool,
    cookie_secure: bool,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let session_store = PostgresStore::new(pool)
        .with_table_name(SESSION_TABLE)
        .map_err(|error| {
            AppError::Validation(format!("invalid session table '{SESSION_TABLE}': {error}"))
        })?;

    session_store
        .migrate()
        .await
        .map_err(|error| AppError::Internal(format!("failed to create session table: {error}")))?;

    Ok(SessionManagerLayer::new(session_store)
        .with_name("tessera.sid")
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            SESSION_INACTIVITY_MINUTES,
        ))))
}
