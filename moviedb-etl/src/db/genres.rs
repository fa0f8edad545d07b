//! Genres table writes

use crate::models::GenreRow;
use sqlx::AnyConnection;

/// Insert (movie, genre) rows; returns rows written
pub async fn insert_genres(conn: &mut AnyConnection, genres: &[GenreRow]) -> Result<u64, sqlx::Error> {
    let mut written = 0;

    for row in genres {
        let result = sqlx::query("INSERT INTO Genres (movieId, genre) VALUES (?, ?)")
            .bind(row.movie_id)
            .bind(&row.genre)
            .execute(&mut *conn)
            .await?;

        written += result.rows_affected();
    }

    Ok(written)
}
