/// Profile and favorites handlers
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::ProfileResponse;
use crate::services::{CatalogService, EngagementService};

/// GET /profile - the authenticated user's comments and favorites
pub async fn profile(user: CurrentUser, pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let account = user_repo::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    let engagement = EngagementService::new((**pool).clone());
    let comments = engagement.list_comments_by_user(user.id).await?;
    let favorites = engagement.list_favorites(user.id).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: account,
        comments,
        favorites,
    }))
}

/// GET /favorite/{id} - toggle the favorites relation, then bounce back to
/// the referring page (or the catalog)
pub async fn toggle_favorite(
    user: CurrentUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();
    let catalog = CatalogService::new((**pool).clone());
    let engagement = EngagementService::new((**pool).clone());

    catalog.get(movie_id).await?;
    let now_favorite = engagement.toggle_favorite(user.id, movie_id).await?;

    tracing::debug!(user_id = %user.id, %movie_id, now_favorite, "favorite toggled");

    let back = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/")
        .to_string();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, back))
        .finish())
}
