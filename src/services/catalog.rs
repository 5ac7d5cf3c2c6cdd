/// Catalog service - search, aggregates, and view counting
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::movie_repo;
use crate::error::{AppError, Result};
use crate::models::{Movie, MovieListing, NewMovie, SearchQuery};

pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Conjunctive filter over the catalog. Blank fields impose no
    /// constraint; a year that is not a non-negative integer string is
    /// ignored rather than rejected.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Movie>> {
        let movies = movie_repo::search(
            &self.pool,
            normalize(query.q.as_deref()),
            normalize(query.genre.as_deref()),
            normalize(query.country.as_deref()),
            parse_year(query.year.as_deref()),
        )
        .await?;

        Ok(movies)
    }

    /// Catalog listing with per-movie average ratings, as shown on the index
    pub async fn search_with_ratings(&self, query: &SearchQuery) -> Result<Vec<MovieListing>> {
        let movies = self.search(query).await?;
        let averages: HashMap<Uuid, f64> = movie_repo::average_ratings_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        Ok(movies
            .into_iter()
            .map(|movie| {
                let average_rating = averages.get(&movie.id).copied().map(round_one_decimal);
                MovieListing {
                    movie,
                    average_rating,
                }
            })
            .collect())
    }

    pub async fn get(&self, movie_id: Uuid) -> Result<Movie> {
        movie_repo::find_by_id(&self.pool, movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {} not found", movie_id)))
    }

    pub async fn create(&self, movie: &NewMovie) -> Result<Movie> {
        let created = movie_repo::create_movie(&self.pool, movie).await?;
        Ok(created)
    }

    /// Mean of non-null comment ratings, rounded to one decimal. None when
    /// the movie has no rated comments.
    pub async fn average_rating(&self, movie_id: Uuid) -> Result<Option<f64>> {
        let avg = movie_repo::average_rating(&self.pool, movie_id).await?;
        Ok(avg.map(round_one_decimal))
    }

    /// Bump the view counter. Fires on every detail retrieval, including
    /// repeat views by the same user; there is deliberately no deduplication
    /// here even though that may over-count.
    pub async fn record_view(&self, movie_id: Uuid) -> Result<()> {
        if !movie_repo::increment_views(&self.pool, movie_id).await? {
            return Err(AppError::NotFound(format!("movie {} not found", movie_id)));
        }
        Ok(())
    }
}

/// Treat blank or whitespace-only filter values as absent
fn normalize(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Year filter applies only when the raw value is a valid non-negative
/// integer string; anything else means "no year filter"
fn parse_year(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
        .and_then(|v| v.parse().ok())
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
