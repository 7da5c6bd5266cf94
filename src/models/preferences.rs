use serde::Serialize;
use std::ops::RangeInclusive;

/// Summary of a user's taste, derived from their library on every refresh
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserPreferences {
    /// Most frequent genres, most frequent first
    pub favorite_genres: Vec<String>,
    /// Ratings the user tends to watch, on the catalog's 0-10 scale
    pub rating_range: RangeInclusive<f64>,
    /// Release years the user tends to watch
    pub year_range: RangeInclusive<i32>,
}
