//! Transform stage
//!
//! Derives `release_year` from the title and splits the pipe-delimited genre
//! list into one row per (movie, genre).

use crate::models::{EnrichedMovie, GenreRow, RatingRecord};
use crate::services::title::extract_release_year;

/// Genre list delimiter in the source file
pub const GENRE_DELIMITER: char = '|';

/// The three destination relations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTables {
    pub movies: Vec<EnrichedMovie>,
    pub ratings: Vec<RatingRecord>,
    pub genres: Vec<GenreRow>,
}

/// Fill `release_year` on every movie in place
pub fn derive_release_years(movies: &mut [EnrichedMovie]) {
    for movie in movies.iter_mut() {
        movie.release_year = extract_release_year(&movie.title);
    }
}

/// Split one movie's genre list into rows, preserving order
///
/// Tokens are trimmed and empty tokens dropped, so an empty list yields no
/// rows.
pub fn explode_genres(movie_id: i64, genres: &str) -> Vec<GenreRow> {
    genres
        .split(GENRE_DELIMITER)
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(|genre| GenreRow::new(movie_id, genre))
        .collect()
}

/// Reshape enriched movies and ratings into the destination relations
pub fn transform(mut movies: Vec<EnrichedMovie>, ratings: Vec<RatingRecord>) -> NormalizedTables {
    derive_release_years(&mut movies);

    let genres: Vec<GenreRow> = movies
        .iter()
        .flat_map(|movie| explode_genres(movie.movie_id, &movie.genres))
        .collect();

    let unknown_years = movies.iter().filter(|m| m.release_year.is_none()).count();
    tracing::info!(
        movies = movies.len(),
        ratings = ratings.len(),
        genres = genres.len(),
        unknown_years,
        "Transform completed"
    );

    NormalizedTables {
        movies,
        ratings,
        genres,
    }
}
