//! Rating rows

use serde::{Deserialize, Serialize};

/// One row of the ratings source file, loaded unchanged
///
/// `movie_id` is expected to reference a movie in the movies file. The
/// pipeline does not check this.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RatingRecord {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    /// Kept as text so it passes through exactly as written in the source
    pub timestamp: String,
}
