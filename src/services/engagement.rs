/// Engagement service - comments, ratings, and the favorites relation
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, favorite_repo};
use crate::error::Result;
use crate::models::{Comment, CommentWithAuthor, Movie, UserComment};

pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a comment. Empty text is a silent no-op, and an out-of-range
    /// rating is stored as "no rating" rather than rejected.
    pub async fn add_comment(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
        text: &str,
        rating: Option<i32>,
    ) -> Result<Option<Comment>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let comment =
            comment_repo::create_comment(&self.pool, movie_id, user_id, text, clamp_rating(rating))
                .await?;

        Ok(Some(comment))
    }

    /// All comments for a movie, newest first
    pub async fn list_comments(&self, movie_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = comment_repo::list_by_movie(&self.pool, movie_id).await?;
        Ok(comments)
    }

    /// All comments by a user, newest first, for the profile view
    pub async fn list_comments_by_user(&self, user_id: Uuid) -> Result<Vec<UserComment>> {
        let comments = comment_repo::list_by_user(&self.pool, user_id).await?;
        Ok(comments)
    }

    /// Flip the favorites relation: remove it when present, insert it when
    /// absent. Returns the new membership state.
    pub async fn toggle_favorite(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool> {
        if favorite_repo::exists(&self.pool, user_id, movie_id).await? {
            favorite_repo::delete(&self.pool, user_id, movie_id).await?;
            Ok(false)
        } else {
            favorite_repo::insert(&self.pool, user_id, movie_id).await?;
            Ok(true)
        }
    }

    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Movie>> {
        let movies = favorite_repo::list_movies_for_user(&self.pool, user_id).await?;
        Ok(movies)
    }
}

/// A rating survives only when it lies in [1,5]; everything else becomes
/// "no rating"
fn clamp_rating(rating: Option<i32>) -> Option<i32> {
    rating.filter(|r| (1..=5).contains(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_ratings_survive() {
        assert_eq!(clamp_rating(Some(1)), Some(1));
        assert_eq!(clamp_rating(Some(3)), Some(3));
        assert_eq!(clamp_rating(Some(5)), Some(5));
    }

    #[test]
    fn out_of_range_ratings_become_absent() {
        assert_eq!(clamp_rating(Some(0)), None);
        assert_eq!(clamp_rating(Some(6)), None);
        assert_eq!(clamp_rating(Some(-1)), None);
        assert_eq!(clamp_rating(Some(100)), None);
        assert_eq!(clamp_rating(None), None);
    }
}
