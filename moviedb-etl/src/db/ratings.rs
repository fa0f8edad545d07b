//! Ratings table writes

use crate::models::RatingRecord;
use sqlx::AnyConnection;

/// Insert ratings unchanged; returns rows written
pub async fn insert_ratings(
    conn: &mut AnyConnection,
    ratings: &[RatingRecord],
) -> Result<u64, sqlx::Error> {
    let mut written = 0;

    for rating in ratings {
        let result = sqlx::query(
            r#"INSERT INTO Ratings (userId, movieId, rating, `timestamp`) VALUES (?, ?, ?, ?)"#,
        )
        .bind(rating.user_id)
        .bind(rating.movie_id)
        .bind(rating.rating)
        .bind(&rating.timestamp)
        .execute(&mut *conn)
        .await?;

        written += result.rows_affected();
    }

    Ok(written)
}
