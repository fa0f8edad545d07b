//! Normalized genre rows

use serde::Serialize;

/// One (movie, genre) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenreRow {
    pub movie_id: i64,
    pub genre: String,
}

impl GenreRow {
    pub fn new(movie_id: i64, genre: impl Into<String>) -> Self {
        Self {
            movie_id,
            genre: genre.into(),
        }
    }
}
