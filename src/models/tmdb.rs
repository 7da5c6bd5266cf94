use serde::Deserialize;

use super::Movie;
use crate::services::genres;

const UNKNOWN_TITLE: &str = "Unknown Title";

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged envelope shared by every TMDB list route
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPagedResponse {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovieItem>,
}

/// One movie (or, on mixed routes, TV show) in a TMDB list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Set instead of `title` for TV results
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl TryFrom<TmdbMovieItem> for Movie {
    type Error = i64;

    /// Fails with the original id when it does not fit the domain's `i32`
    fn try_from(item: TmdbMovieItem) -> Result<Self, Self::Error> {
        let id = i32::try_from(item.id).map_err(|_| item.id)?;

        let title = item
            .title
            .or(item.name)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let genres = item
            .genre_ids
            .unwrap_or_default()
            .into_iter()
            .filter_map(genres::genre_name)
            .map(str::to_string)
            .collect();

        Ok(Movie {
            id,
            title,
            poster_path: item.poster_path,
            overview: item.overview.filter(|o| !o.is_empty()),
            release_date: item.release_date.filter(|d| !d.is_empty()),
            vote_average: item.vote_average,
            genres,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_response_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                "overview": "Cobb, a skilled thief...",
                "release_date": "2010-07-15",
                "genre_ids": [28, 878, 12],
                "vote_average": 8.4
            }],
            "total_pages": 500
        }"#;

        let response: TmdbPagedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.page, 1);
        assert_eq!(response.results.len(), 1);

        let movie = Movie::try_from(response.results[0].clone()).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.release_year(), Some(2010));
        assert_eq!(movie.vote_average, Some(8.4));
        assert_eq!(
            movie.genres,
            vec!["Action", "Science Fiction", "Adventure"]
        );
    }

    #[test]
    fn test_title_falls_back_to_name_then_placeholder() {
        let tv = TmdbMovieItem {
            id: 1396,
            title: None,
            name: Some("Breaking Bad".to_string()),
            poster_path: None,
            overview: None,
            release_date: None,
            genre_ids: None,
            vote_average: None,
        };
        assert_eq!(Movie::try_from(tv.clone()).unwrap().title, "Breaking Bad");

        let nameless = TmdbMovieItem { name: None, ..tv };
        assert_eq!(Movie::try_from(nameless).unwrap().title, "Unknown Title");
    }

    #[test]
    fn test_unknown_genre_ids_are_dropped() {
        let item = TmdbMovieItem {
            id: 1,
            title: Some("Odd".to_string()),
            name: None,
            poster_path: None,
            overview: None,
            release_date: Some(String::new()),
            genre_ids: Some(vec![99, 424242]),
            vote_average: None,
        };
        let movie = Movie::try_from(item).unwrap();
        assert_eq!(movie.genres, vec!["Documentary"]);
        assert_eq!(movie.release_date, None);
    }

    #[test]
    fn test_out_of_range_id_is_rejected() {
        let item = TmdbMovieItem {
            id: i64::from(i32::MAX) + 1,
            title: Some("Far Future".to_string()),
            name: None,
            poster_path: None,
            overview: None,
            release_date: None,
            genre_ids: None,
            vote_average: None,
        };
        assert_eq!(Movie::try_from(item), Err(i64::from(i32::MAX) + 1));
    }
}
