/// Session service - opaque server-tracked tokens bound to a browser cookie
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::session_repo;
use crate::error::Result;
use crate::models::Session;

pub struct SessionService {
    pool: PgPool,
    ttl_hours: i64,
}

impl SessionService {
    pub fn new(pool: PgPool, ttl_hours: i64) -> Self {
        Self { pool, ttl_hours }
    }

    /// Issue a new session token for a user
    pub async fn start(&self, user_id: Uuid) -> Result<Session> {
        let session = session_repo::create_session(&self.pool, user_id, self.ttl_hours).await?;
        Ok(session)
    }

    /// Invalidate a session token. Unknown tokens are a no-op.
    pub async fn end(&self, token: Uuid) -> Result<()> {
        session_repo::delete_session(&self.pool, token).await?;
        Ok(())
    }
}
