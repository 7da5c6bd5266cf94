use chrono::{DateTime, Utc};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use uuid::Uuid;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/";
const POSTER_SIZE: &str = "w500";

/// A movie as shown in a rail or stored against a user
///
/// Built verbatim from a catalog record, or synthesized from user input with
/// every optional field left empty.
///
/// Serialized with a derived `poster_url` so clients never assemble image URLs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog-assigned identifier
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// ISO-like date, only the leading year is interpreted
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average rating on the catalog's 0-10 scale
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Movie {
    /// Movie entered by hand rather than picked from the catalog
    ///
    /// The id is derived from the title so re-adding the same title hits the
    /// same library record. Local ids are negative and never collide with
    /// catalog ids.
    pub fn local(title: impl Into<String>, genres: Vec<String>) -> Self {
        let title = title.into();
        let digest = Uuid::new_v5(&Uuid::NAMESPACE_OID, title.to_lowercase().as_bytes());
        let bytes = digest.as_bytes();
        let hash = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let id = -((hash & i32::MAX).max(1));

        Self {
            id,
            title,
            poster_path: None,
            overview: None,
            release_date: None,
            vote_average: None,
            genres,
        }
    }

    /// Year parsed from the first four characters of the release date
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    /// Full poster URL at the size the client renders
    pub fn poster_url(&self) -> Option<String> {
        let path = self.poster_path.as_deref()?.trim();
        if path.is_empty() {
            return None;
        }
        let path = path.strip_prefix('/').unwrap_or(path);
        Some(format!("{}{}/{}", POSTER_BASE_URL, POSTER_SIZE, path))
    }
}

impl Serialize for Movie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut movie = serializer.serialize_struct("Movie", 8)?;
        movie.serialize_field("id", &self.id)?;
        movie.serialize_field("title", &self.title)?;
        movie.serialize_field("poster_path", &self.poster_path)?;
        movie.serialize_field("poster_url", &self.poster_url())?;
        movie.serialize_field("overview", &self.overview)?;
        movie.serialize_field("release_date", &self.release_date)?;
        movie.serialize_field("vote_average", &self.vote_average)?;
        movie.serialize_field("genres", &self.genres)?;
        movie.end()
    }
}

/// Which personal list a movie is on
///
/// A single state instead of two flags: a record can never be both watched
/// and on the watchlist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    #[default]
    None,
    Watchlisted,
    Watched,
}

impl ListStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStatus::None => "none",
            ListStatus::Watchlisted => "watchlisted",
            ListStatus::Watched => "watched",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(ListStatus::None),
            "watchlisted" => Some(ListStatus::Watchlisted),
            "watched" => Some(ListStatus::Watched),
            _ => None,
        }
    }
}

/// A movie on one of a user's lists, with the movie fields denormalized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMovie {
    pub user_id: String,
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genres: Vec<String>,
    pub status: ListStatus,
    pub added_at: DateTime<Utc>,
    /// Last time the record was written or changed list; listings sort on it
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl UserMovie {
    pub fn new(user_id: impl Into<String>, movie: &Movie, status: ListStatus) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            movie_id: movie.id,
            title: movie.title.clone(),
            poster_path: movie.poster_path.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            vote_average: movie.vote_average,
            genres: movie.genres.clone(),
            status,
            added_at: now,
            updated_at: now,
        }
    }

    /// Moves the record to another list, stamping the change
    pub fn set_status(&mut self, status: ListStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Composite key identifying the (user, movie) pair
    pub fn key(&self) -> String {
        format!("{}:{}", self.user_id, self.movie_id)
    }

    pub fn to_movie(&self) -> Movie {
        Movie {
            id: self.movie_id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            overview: self.overview.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            genres: self.genres.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Movie {
        Movie {
            id: 693134,
            title: "Dune: Part Two".to_string(),
            poster_path: Some("/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg".to_string()),
            overview: Some("Paul Atreides unites with the Fremen.".to_string()),
            release_date: Some("2024-02-27".to_string()),
            vote_average: Some(8.2),
            genres: vec!["Science Fiction".to_string(), "Adventure".to_string()],
        }
    }

    #[test]
    fn test_release_year_from_full_date() {
        assert_eq!(dune().release_year(), Some(2024));
    }

    #[test]
    fn test_release_year_from_bare_year() {
        let movie = Movie {
            release_date: Some("1994".to_string()),
            ..dune()
        };
        assert_eq!(movie.release_year(), Some(1994));
    }

    #[test]
    fn test_release_year_unparseable() {
        let short = Movie {
            release_date: Some("94".to_string()),
            ..dune()
        };
        let garbage = Movie {
            release_date: Some("soon".to_string()),
            ..dune()
        };
        assert_eq!(short.release_year(), None);
        assert_eq!(garbage.release_year(), None);
    }

    #[test]
    fn test_poster_url_strips_leading_slash() {
        assert_eq!(
            dune().poster_url(),
            Some("https://image.tmdb.org/t/p/w500/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg".to_string())
        );
    }

    #[test]
    fn test_poster_url_blank_path() {
        let movie = Movie {
            poster_path: Some("  ".to_string()),
            ..dune()
        };
        assert_eq!(movie.poster_url(), None);
    }

    #[test]
    fn test_local_movie_has_negative_stable_id() {
        let first = Movie::local("Home Video", vec![]);
        let second = Movie::local("home video", vec!["Drama".to_string()]);
        assert!(first.id < 0);
        assert_eq!(first.id, second.id);
        assert_eq!(first.poster_path, None);
        assert_eq!(first.vote_average, None);
    }

    #[test]
    fn test_user_movie_copies_every_field() {
        let movie = dune();
        let record = UserMovie::new("user-1", &movie, ListStatus::Watchlisted);
        assert_eq!(record.key(), "user-1:693134");
        assert_eq!(record.to_movie(), movie);
        assert_eq!(record.status, ListStatus::Watchlisted);
        assert_eq!(record.added_at, record.updated_at);
    }

    #[test]
    fn test_set_status_stamps_update_time() {
        let mut record = UserMovie::new("user-1", &dune(), ListStatus::Watchlisted);
        record.added_at -= chrono::Duration::days(30);
        record.updated_at = record.added_at;

        record.set_status(ListStatus::Watched);

        assert_eq!(record.status, ListStatus::Watched);
        assert!(record.updated_at > record.added_at);
    }

    #[test]
    fn test_serialized_movie_carries_poster_url() {
        let json = serde_json::to_value(dune()).unwrap();
        assert_eq!(
            json["poster_url"],
            "https://image.tmdb.org/t/p/w500/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg"
        );
        assert_eq!(json["poster_path"], "/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg");

        let back: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(back, dune());
    }

    #[test]
    fn test_local_ids_spread_over_similar_titles() {
        let ids: std::collections::HashSet<i32> = (0..200)
            .map(|i| Movie::local(format!("Home Video {}", i), vec![]).id)
            .collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| *id < 0));
    }

    #[test]
    fn test_record_without_update_time_still_decodes() {
        let mut json = serde_json::to_value(UserMovie::new("u", &dune(), ListStatus::Watched)).unwrap();
        json.as_object_mut().unwrap().remove("updated_at");
        let record: UserMovie = serde_json::from_value(json).unwrap();
        assert_eq!(record.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_list_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ListStatus::Watchlisted).unwrap(),
            "\"watchlisted\""
        );
        assert_eq!(ListStatus::parse("watched"), Some(ListStatus::Watched));
        assert_eq!(ListStatus::parse("both"), None);
    }
}
