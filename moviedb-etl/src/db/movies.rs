//! Movies table writes

use crate::models::EnrichedMovie;
use sqlx::AnyConnection;

/// Insert movies; returns rows written
pub async fn insert_movies(
    conn: &mut AnyConnection,
    movies: &[EnrichedMovie],
) -> Result<u64, sqlx::Error> {
    let mut written = 0;

    for movie in movies {
        let result = sqlx::query(
            r#"
            INSERT INTO Movies (movieId, title, release_year, director, plot, box_office)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movie.movie_id)
        .bind(&movie.title)
        .bind(movie.release_year)
        .bind(&movie.director)
        .bind(&movie.plot)
        .bind(&movie.box_office)
        .execute(&mut *conn)
        .await?;

        written += result.rows_affected();
    }

    Ok(written)
}
