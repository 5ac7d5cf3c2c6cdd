/// Media gateway handlers - raw upload, file serving, and the player page
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;

use crate::error::{AppError, Result};
use crate::models::UploadResponse;
use crate::services::media::{content_type_for, is_valid_key};
use crate::services::{MediaKind, MediaStore};

/// POST /upload - generic video upload. Unlike the admin movie form, this
/// path imposes no extension policy (two distinct upload policies are kept
/// deliberately).
pub async fn upload(media: web::Data<MediaStore>, mut payload: Multipart) -> Result<HttpResponse> {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        if field.name() != "file" {
            drain_field(&mut field).await?;
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .unwrap_or_default()
            .to_string();
        let bytes = read_field(&mut field).await?;
        uploaded = Some((filename, bytes));
    }

    let (filename, bytes) = match uploaded {
        Some(uploaded) => uploaded,
        None => {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"error": "No file provided"})))
        }
    };

    if filename.is_empty() {
        return Ok(
            HttpResponse::BadRequest().json(serde_json::json!({"error": "No selected file"}))
        );
    }

    let stored = media.store(MediaKind::Video, &filename, &bytes)?;
    tracing::info!(key = %stored.key, name = %stored.original_name, "video uploaded");

    Ok(HttpResponse::Created().json(UploadResponse {
        message: "Video uploaded successfully".to_string(),
        video_url: format!("/videos/{}", stored.key),
    }))
}

/// GET /videos/{key} - serve a stored video file
pub async fn get_video(media: web::Data<MediaStore>, key: web::Path<String>) -> Result<HttpResponse> {
    let bytes = media.fetch(MediaKind::Video, &key)?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&key))
        .body(bytes))
}

/// GET /posters/{key} - serve a stored poster image
pub async fn get_poster(
    media: web::Data<MediaStore>,
    key: web::Path<String>,
) -> Result<HttpResponse> {
    let bytes = media.fetch(MediaKind::Poster, &key)?;

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&key))
        .body(bytes))
}

/// GET /watch/{key} - minimal player page referencing the video URL
pub async fn watch(key: web::Path<String>) -> Result<HttpResponse> {
    if !is_valid_key(&key) {
        return Err(AppError::NotFound(format!("file {} not found", key)));
    }

    let page = format!(
        r#"<!doctype html>
<html><head><title>Watch</title></head><body>
<video controls width="720" src="/videos/{key}"></video>
</body></html>"#,
        key = &*key
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

/// Read an entire multipart field into memory (uploads are fully buffered)
pub(crate) async fn read_field(field: &mut Field) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
        data.extend_from_slice(&bytes);
    }
    Ok(data)
}

pub(crate) async fn drain_field(field: &mut Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {}", e)))?;
    }
    Ok(())
}
