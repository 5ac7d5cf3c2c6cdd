use crate::models::{Movie, NewMovie};
use sqlx::{PgPool, Row};
use uuid::Uuid;

const MOVIE_COLUMNS: &str = "id, title, year, country, genre, slogan, director, writer, \
     video_key, video_name, poster_key, poster_name, views, created_at";

/// Insert a new catalog entry
pub async fn create_movie(pool: &PgPool, movie: &NewMovie) -> Result<Movie, sqlx::Error> {
    let created = sqlx::query_as::<_, Movie>(&format!(
        r#"
        INSERT INTO movies
            (title, year, country, genre, slogan, director, writer,
             video_key, video_name, poster_key, poster_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {MOVIE_COLUMNS}
        "#
    ))
    .bind(&movie.title)
    .bind(movie.year)
    .bind(&movie.country)
    .bind(&movie.genre)
    .bind(&movie.slogan)
    .bind(&movie.director)
    .bind(&movie.writer)
    .bind(&movie.video_key)
    .bind(&movie.video_name)
    .bind(&movie.poster_key)
    .bind(&movie.poster_name)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn find_by_id(pool: &PgPool, movie_id: Uuid) -> Result<Option<Movie>, sqlx::Error> {
    let movie = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
    ))
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(movie)
}

/// Conjunctive catalog search. Each provided filter narrows the result set;
/// absent filters impose no constraint. Substring matches are
/// case-insensitive, year is exact.
pub async fn search(
    pool: &PgPool,
    title: Option<&str>,
    genre: Option<&str>,
    country: Option<&str>,
    year: Option<i32>,
) -> Result<Vec<Movie>, sqlx::Error> {
    let movies = sqlx::query_as::<_, Movie>(&format!(
        r#"
        SELECT {MOVIE_COLUMNS}
        FROM movies
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR genre ILIKE '%' || $2 || '%')
          AND ($3::text IS NULL OR country ILIKE '%' || $3 || '%')
          AND ($4::int4 IS NULL OR year = $4)
        ORDER BY created_at
        "#
    ))
    .bind(title)
    .bind(genre)
    .bind(country)
    .bind(year)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Increment the view counter. Runs as a single UPDATE so concurrent views
/// cannot lose increments.
pub async fn increment_views(pool: &PgPool, movie_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE movies SET views = views + 1 WHERE id = $1")
        .bind(movie_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Mean of non-null comment ratings for one movie, unrounded
pub async fn average_rating(pool: &PgPool, movie_id: Uuid) -> Result<Option<f64>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT AVG(rating)::float8 AS avg FROM comments WHERE movie_id = $1 AND rating IS NOT NULL",
    )
    .bind(movie_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<Option<f64>, _>("avg"))
}

/// Mean rating per movie for every movie that has at least one rated comment
pub async fn average_ratings_all(pool: &PgPool) -> Result<Vec<(Uuid, f64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT movie_id, AVG(rating)::float8 AS avg
        FROM comments
        WHERE rating IS NOT NULL
        GROUP BY movie_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let averages = rows
        .into_iter()
        .map(|row| {
            let movie_id: Uuid = row.get("movie_id");
            let avg: f64 = row.get("avg");
            (movie_id, avg)
        })
        .collect();

    Ok(averages)
}
