use crate::models::{Session, User};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a session with a fresh opaque token
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<Session, sqlx::Error> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        RETURNING token, user_id, created_at, expires_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Resolve a session token to its user, ignoring expired sessions
pub async fn find_user_by_token(pool: &PgPool, token: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.password_hash, u.is_admin, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
