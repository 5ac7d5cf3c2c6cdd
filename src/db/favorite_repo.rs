use crate::models::Movie;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Check whether the (user, movie) relation exists
pub async fn exists(pool: &PgPool, user_id: Uuid, movie_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND movie_id = $2) AS present",
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<bool, _>("present"))
}

/// Insert the relation. The composite primary key guarantees at most one row
/// per (user, movie) pair; a concurrent duplicate insert is ignored.
pub async fn insert(pool: &PgPool, user_id: Uuid, movie_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO favorites (user_id, movie_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, movie_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete(pool: &PgPool, user_id: Uuid, movie_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND movie_id = $2")
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// All movies a user has favorited
pub async fn list_movies_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Movie>, sqlx::Error> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT m.id, m.title, m.year, m.country, m.genre, m.slogan, m.director, m.writer,
               m.video_key, m.video_name, m.poster_key, m.poster_name, m.views, m.created_at
        FROM favorites f
        JOIN movies m ON m.id = f.movie_id
        WHERE f.user_id = $1
        ORDER BY m.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}
