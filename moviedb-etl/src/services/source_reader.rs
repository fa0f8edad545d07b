//! Source reader
//!
//! Parses the movies and ratings CSV files. Any problem is returned as a
//! [`SourceError`]; deciding to stop the process is left to the caller.

use crate::error::SourceError;
use crate::models::{MovieRecord, RatingRecord};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Both source tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceData {
    pub movies: Vec<MovieRecord>,
    pub ratings: Vec<RatingRecord>,
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Read `movieId,title,genres`
pub fn read_movies(path: &Path) -> Result<Vec<MovieRecord>, SourceError> {
    read_csv(path)
}

/// Read `userId,movieId,rating,timestamp`
pub fn read_ratings(path: &Path) -> Result<Vec<RatingRecord>, SourceError> {
    read_csv(path)
}

/// Read both files; the first failure aborts
pub fn read_sources(movies_path: &Path, ratings_path: &Path) -> Result<SourceData, SourceError> {
    let movies = read_movies(movies_path)?;
    let ratings = read_ratings(ratings_path)?;

    info!(
        movies = movies.len(),
        ratings = ratings.len(),
        "Source files read"
    );

    Ok(SourceData { movies, ratings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_movies() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "movies.csv",
            "movieId,title,genres\n1,Toy Story (1995),Adventure|Animation\n2,\"American President, The (1995)\",Comedy|Drama|Romance\n",
        );

        let movies = read_movies(&path).unwrap();
        assert_eq!(
            movies,
            vec![
                MovieRecord::new(1, "Toy Story (1995)", "Adventure|Animation"),
                MovieRecord::new(2, "American President, The (1995)", "Comedy|Drama|Romance"),
            ]
        );
    }

    #[test]
    fn test_read_movies_empty_genres() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "movies.csv", "movieId,title,genres\n5,Untitled,\n");

        let movies = read_movies(&path).unwrap();
        assert_eq!(movies[0].genres, "");
    }

    #[test]
    fn test_read_ratings_keeps_timestamp_text() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ratings.csv",
            "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,3.5,t0\n",
        );

        let ratings = read_ratings(&path).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].timestamp, "964982703");
        assert_eq!(ratings[1].rating, 3.5);
        assert_eq!(ratings[1].timestamp, "t0");
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.csv");

        let err = read_movies(&missing).unwrap_err();
        assert!(matches!(err, SourceError::SourceNotFound { ref path } if path == &missing));
    }

    #[test]
    fn test_malformed_row_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "movies.csv", "movieId,title,genres\nabc,Toy Story (1995),Animation\n");

        let err = read_movies(&path).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "ratings.csv", "userId,movieId,rating\n1,1,4.0\n");

        let err = read_ratings(&path).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn test_read_sources_stops_at_first_missing_file() {
        let dir = TempDir::new().unwrap();
        let movies = write(&dir, "movies.csv", "movieId,title,genres\n1,Toy Story (1995),Animation\n");
        let ratings = dir.path().join("ratings.csv");

        let err = read_sources(&movies, &ratings).unwrap_err();
        assert!(matches!(err, SourceError::SourceNotFound { .. }));
    }
}
