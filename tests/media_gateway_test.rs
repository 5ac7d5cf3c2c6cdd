use actix_web::{http::header, test, web, App};
use tempfile::TempDir;

use cinema_service::config::MediaConfig;
use cinema_service::handlers;
use cinema_service::services::MediaStore;

fn temp_media_store() -> (TempDir, MediaStore) {
    let dir = TempDir::new().unwrap();
    let config = MediaConfig {
        video_dir: dir.path().join("movies").to_string_lossy().into_owned(),
        poster_dir: dir.path().join("posters").to_string_lossy().into_owned(),
    };
    let store = MediaStore::new(&config);
    store.ensure_dirs().unwrap();
    (dir, store)
}

fn multipart_file(boundary: &str, field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[actix_rt::test]
async fn upload_then_fetch_returns_identical_bytes() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/upload", web::post().to(handlers::media::upload))
            .route("/videos/{key}", web::get().to(handlers::media::get_video)),
    )
    .await;

    let payload = b"\x00\x00\x00\x18ftypmp42 not really a video".to_vec();
    let boundary = "test-boundary";
    let body = multipart_file(boundary, "file", "trailer.mp4", &payload);

    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "Video uploaded successfully");
    let video_url = json["video_url"].as_str().unwrap().to_string();
    assert!(video_url.starts_with("/videos/"));

    let req = test::TestRequest::get().uri(&video_url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );

    let fetched = test::read_body(resp).await;
    assert_eq!(&fetched[..], &payload[..]);
}

#[actix_rt::test]
async fn generic_upload_has_no_extension_policy() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/upload", web::post().to(handlers::media::upload)),
    )
    .await;

    // Unlike the admin movie form, /upload accepts any filename
    let boundary = "test-boundary";
    let body = multipart_file(boundary, "file", "notes.txt", b"plain text");

    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
}

#[actix_rt::test]
async fn upload_without_file_field_is_rejected() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/upload", web::post().to(handlers::media::upload)),
    )
    .await;

    let boundary = "test-boundary";
    let body = format!("--{boundary}--\r\n").into_bytes();

    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "No file provided");
}

#[actix_rt::test]
async fn upload_with_empty_filename_is_rejected() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/upload", web::post().to(handlers::media::upload)),
    )
    .await;

    let boundary = "test-boundary";
    let body = multipart_file(boundary, "file", "", b"data");

    let req = test::TestRequest::post()
        .uri("/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "No selected file");
}

#[actix_rt::test]
async fn fetching_unknown_key_is_404() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/videos/{key}", web::get().to(handlers::media::get_video)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/videos/11111111-2222-3333-4444-555555555555.mp4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn traversal_shaped_keys_are_404() {
    let (_dir, store) = temp_media_store();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .route("/videos/{key}", web::get().to(handlers::media::get_video)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/videos/..%2F..%2Fetc%2Fpasswd")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
