use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::models::{Movie, UserPreferences};

pub const TOP_GENRE_COUNT: usize = 3;
pub const RATING_TOLERANCE: f64 = 1.0;
pub const DEFAULT_RATING_CENTER: f64 = 7.0;
pub const YEAR_TOLERANCE: i32 = 5;
pub const DEFAULT_YEAR_RANGE: RangeInclusive<i32> = 2000..=2024;

/// Derives a preference profile from the movies on a user's lists
///
/// Favorite genres are the three most frequent genre tags; equal counts keep
/// the order in which the genres were first seen. The rating range is the mean
/// rating ± 1.0 (centered on 7.0 without ratings), the year range the mean
/// release year ± 5 (2000-2024 without parseable dates).
pub fn build_preferences(movies: &[Movie]) -> UserPreferences {
    UserPreferences {
        favorite_genres: favorite_genres(movies),
        rating_range: rating_range(movies),
        year_range: year_range(movies),
    }
}

fn favorite_genres(movies: &[Movie]) -> Vec<String> {
    // (count, first seen position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for genre in movies.iter().flat_map(|m| m.genres.iter()) {
        let next = counts.len();
        counts.entry(genre.as_str()).or_insert((0, next)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(genre, (count, first_seen))| (genre, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(TOP_GENRE_COUNT)
        .map(|(genre, _, _)| genre.to_string())
        .collect()
}

fn rating_range(movies: &[Movie]) -> RangeInclusive<f64> {
    let center = mean(movies.iter().filter_map(|m| m.vote_average)).unwrap_or(DEFAULT_RATING_CENTER);
    (center - RATING_TOLERANCE)..=(center + RATING_TOLERANCE)
}

fn year_range(movies: &[Movie]) -> RangeInclusive<i32> {
    match mean(movies.iter().filter_map(|m| m.release_year()).map(f64::from)) {
        Some(avg) => {
            let center = avg.floor() as i32;
            (center - YEAR_TOLERANCE)..=(center + YEAR_TOLERANCE)
        }
        None => DEFAULT_YEAR_RANGE,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
