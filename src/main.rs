use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use sqlx::PgPool;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_service::db::create_pool;
use cinema_service::handlers;
use cinema_service::services::MediaStore;
use cinema_service::Config;

async fn health(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "cinema-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "cinema-service"
        })),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting cinema-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to run migrations: {}", e),
            )
        })?;
    tracing::info!("Database migrations applied");

    // Media storage directories must exist before the first upload
    let media = MediaStore::new(&config.media);
    media.ensure_dirs()?;

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let config_data = web::Data::new(config.clone());
    let pool_data = web::Data::new(db_pool.clone());
    let media_data = web::Data::new(media.clone());

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.app.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(media_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(health))
            .route("/", web::get().to(handlers::catalog::index))
            .route("/upload", web::post().to(handlers::media::upload))
            .route("/videos/{key}", web::get().to(handlers::media::get_video))
            .route("/watch/{key}", web::get().to(handlers::media::watch))
            .route("/posters/{key}", web::get().to(handlers::media::get_poster))
            .service(
                web::resource("/register")
                    .route(web::get().to(handlers::auth::register_page))
                    .route(web::post().to(handlers::auth::register)),
            )
            .service(
                web::resource("/login")
                    .route(web::get().to(handlers::auth::login_page))
                    .route(web::post().to(handlers::auth::login)),
            )
            .route("/logout", web::get().to(handlers::auth::logout))
            .route("/upload_form", web::get().to(handlers::movies::upload_form))
            .service(
                web::resource("/add_movie")
                    .route(web::get().to(handlers::movies::add_movie_page))
                    .route(web::post().to(handlers::movies::add_movie)),
            )
            .service(
                web::resource("/movie/{movie_id}")
                    .route(web::get().to(handlers::movies::movie_detail))
                    .route(web::post().to(handlers::movies::add_comment)),
            )
            .route("/profile", web::get().to(handlers::profile::profile))
            .route(
                "/favorite/{movie_id}",
                web::get().to(handlers::profile::toggle_favorite),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
