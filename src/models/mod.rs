/// Data models for cinema-service
///
/// Domain rows (sqlx `FromRow`) plus the request/response shapes used by the
/// HTTP surface.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Server-tracked session, resolved from the browser cookie
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub genre: Option<String>,
    pub slogan: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    /// Opaque storage key under the video directory
    pub video_key: String,
    /// Original upload filename, kept for display only
    pub video_name: String,
    pub poster_key: Option<String>,
    pub poster_name: Option<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Comment row as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's username, for movie detail pages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its movie title, for the profile page
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserComment {
    pub id: Uuid,
    pub movie_id: Uuid,
    pub movie_title: String,
    pub text: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a new catalog entry, parsed from the admin upload form
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub genre: Option<String>,
    pub slogan: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub video_key: String,
    pub video_name: String,
    pub poster_key: Option<String>,
    pub poster_name: Option<String>,
}

// ============================================
// Request/response shapes
// ============================================

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
    /// Raw rating input; anything that is not an integer in [1,5] is stored
    /// as "no rating"
    pub rating: Option<String>,
}

/// Query parameters accepted by the catalog listing
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub year: Option<String>,
}

/// Catalog listing entry with its aggregate rating
#[derive(Debug, Serialize)]
pub struct MovieListing {
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: Option<f64>,
}

/// Movie detail page payload
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: Option<f64>,
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub video_url: String,
}

/// Profile page payload
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub comments: Vec<UserComment>,
    pub favorites: Vec<Movie>,
}
