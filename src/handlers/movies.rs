/// Movie creation and detail handlers
use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse};
use futures_util::StreamExt;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::handlers::media::read_field;
use crate::middleware::{AdminUser, CurrentUser};
use crate::models::{CommentForm, MovieDetail, NewMovie};
use crate::services::media::has_mp4_suffix;
use crate::services::{CatalogService, EngagementService, MediaKind, MediaStore};

const UPLOAD_PAGE: &str = r#"<!doctype html>
<html><head><title>Upload</title></head><body>
<h1>Upload a video</h1>
<form method="post" action="/upload" enctype="multipart/form-data">
  <input type="file" name="file" required>
  <button type="submit">Upload</button>
</form>
</body></html>"#;

const ADD_MOVIE_PAGE: &str = r#"<!doctype html>
<html><head><title>Add movie</title></head><body>
<h1>Add a movie</h1>
<form method="post" action="/add_movie" enctype="multipart/form-data">
  <input name="title" placeholder="Title" required>
  <input name="year" placeholder="Year">
  <input name="country" placeholder="Country">
  <input name="genre" placeholder="Genre">
  <input name="slogan" placeholder="Slogan">
  <input name="director" placeholder="Director">
  <input name="writer" placeholder="Writer">
  <label>Video (.mp4) <input type="file" name="file" required></label>
  <label>Poster <input type="file" name="poster"></label>
  <button type="submit">Add</button>
</form>
</body></html>"#;

/// GET /upload_form - login-gated upload page
pub async fn upload_form(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(UPLOAD_PAGE)
}

/// GET /add_movie - admin-only movie creation form
pub async fn add_movie_page(_admin: AdminUser) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(ADD_MOVIE_PAGE)
}

/// POST /add_movie - admin-only catalog entry creation.
/// The movie file must be .mp4; the poster is optional and unchecked.
pub async fn add_movie(
    _admin: AdminUser,
    pool: web::Data<PgPool>,
    media: web::Data<MediaStore>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut movie = NewMovie::default();
    let mut year_raw: Option<String> = None;
    let mut video: Option<(String, Vec<u8>)> = None;
    let mut poster: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|f| f.to_string());
        let bytes = read_field(&mut field).await?;

        match name.as_str() {
            "file" => {
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    video = Some((filename, bytes));
                }
            }
            "poster" => {
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    poster = Some((filename, bytes));
                }
            }
            text_field => {
                let value = String::from_utf8_lossy(&bytes).trim().to_string();
                let value = (!value.is_empty()).then_some(value);
                match text_field {
                    "title" => movie.title = value.unwrap_or_default(),
                    "year" => year_raw = value,
                    "country" => movie.country = value,
                    "genre" => movie.genre = value,
                    "slogan" => movie.slogan = value,
                    "director" => movie.director = value,
                    "writer" => movie.writer = value,
                    _ => {}
                }
            }
        }
    }

    let (video_name, video_bytes) = video
        .filter(|(name, _)| has_mp4_suffix(name))
        .ok_or_else(|| AppError::BadRequest("Video file missing or not .mp4".to_string()))?;

    if movie.title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }

    movie.year = year_raw.and_then(|v| v.parse().ok());

    let stored_video = media.store(MediaKind::Video, &video_name, &video_bytes)?;
    movie.video_key = stored_video.key;
    movie.video_name = stored_video.original_name;

    if let Some((poster_name, poster_bytes)) = poster {
        let stored_poster = media.store(MediaKind::Poster, &poster_name, &poster_bytes)?;
        movie.poster_key = Some(stored_poster.key);
        movie.poster_name = Some(stored_poster.original_name);
    }

    let catalog = CatalogService::new((**pool).clone());
    let created = catalog.create(&movie).await?;

    tracing::info!(movie_id = %created.id, title = %created.title, "movie added to catalog");

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

/// GET /movie/{id} - detail payload. Every retrieval bumps the view counter,
/// repeat views included.
pub async fn movie_detail(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();
    let catalog = CatalogService::new((**pool).clone());
    let engagement = EngagementService::new((**pool).clone());

    catalog.record_view(movie_id).await?;
    let movie = catalog.get(movie_id).await?;
    let average_rating = catalog.average_rating(movie_id).await?;
    let comments = engagement.list_comments(movie_id).await?;

    Ok(HttpResponse::Ok().json(MovieDetail {
        movie,
        average_rating,
        comments,
    }))
}

/// POST /movie/{id} - append a comment (login required)
pub async fn add_comment(
    user: CurrentUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let movie_id = path.into_inner();
    let catalog = CatalogService::new((**pool).clone());
    let engagement = EngagementService::new((**pool).clone());

    // 404 before accepting input, same as the detail page
    catalog.get(movie_id).await?;

    let rating = form
        .rating
        .as_deref()
        .and_then(|r| r.trim().parse::<i32>().ok());

    engagement
        .add_comment(movie_id, user.id, &form.text, rating)
        .await?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/movie/{}", movie_id)))
        .finish())
}
