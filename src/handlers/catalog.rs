/// Catalog listing handler
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::SearchQuery;
use crate::services::CatalogService;

/// GET / - catalog listing with optional q/genre/country/year filters
pub async fn index(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let catalog = CatalogService::new((**pool).clone());
    let movies = catalog.search_with_ratings(&query).await?;

    Ok(HttpResponse::Ok().json(movies))
}
