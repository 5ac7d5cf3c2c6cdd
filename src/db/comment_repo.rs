use crate::models::{Comment, CommentWithAuthor, UserComment};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment on a movie. Rating is assumed to be already clamped
/// to [1,5] or absent; the CHECK constraint backs this up.
pub async fn create_comment(
    pool: &PgPool,
    movie_id: Uuid,
    user_id: Uuid,
    text: &str,
    rating: Option<i32>,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (movie_id, user_id, text, rating)
        VALUES ($1, $2, $3, $4)
        RETURNING id, movie_id, user_id, text, rating, created_at
        "#,
    )
    .bind(movie_id)
    .bind(user_id)
    .bind(text)
    .bind(rating)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// All comments for a movie, newest first, with author usernames
pub async fn list_by_movie(
    pool: &PgPool,
    movie_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.movie_id, c.user_id, u.username, c.text, c.rating, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.movie_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// All comments a user has written, newest first, with movie titles
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserComment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, UserComment>(
        r#"
        SELECT c.id, c.movie_id, m.title AS movie_title, c.text, c.rating, c.created_at
        FROM comments c
        JOIN movies m ON m.id = c.movie_id
        WHERE c.user_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
