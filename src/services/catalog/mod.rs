//! Movie catalog abstraction
//!
//! The home and trending screens only ever need four list shapes from the
//! catalog: now playing, upcoming, popular, and a discover query filtered by
//! genre or by streaming provider. Each implementation maps its wire records
//! into [`Movie`].
use crate::{
    error::AppResult,
    models::{Movie, StreamingPlatform, UserPreferences},
    services::genres,
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

pub const DEFAULT_SORT: &str = "popularity.desc";
pub const DEFAULT_REGION: &str = "US";

/// How many favorite genres a personalized discover query filters by
pub const DISCOVER_GENRE_LIMIT: usize = 2;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Movies currently in theaters
    async fn now_playing(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Movies about to be released
    async fn upcoming(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Generic popular movies, used whenever nothing personal is known
    async fn popular(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Filtered discovery, see [`DiscoverQuery`]
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Streaming provider filter for a discover query
#[derive(Debug, Clone, PartialEq)]
pub struct WatchProvider {
    pub provider_id: u32,
    pub region: String,
}

/// Parameters of a discover query
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    /// Movies must carry all of these genres
    pub genre_ids: Vec<u32>,
    pub provider: Option<WatchProvider>,
    pub sort_by: String,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            genre_ids: Vec::new(),
            provider: None,
            sort_by: DEFAULT_SORT.to_string(),
            page: 1,
        }
    }
}

impl DiscoverQuery {
    pub fn by_genres(genre_ids: Vec<u32>) -> Self {
        Self {
            genre_ids,
            ..Self::default()
        }
    }

    /// Popular movies available on a streaming platform
    pub fn by_platform(platform: StreamingPlatform) -> Self {
        Self {
            provider: Some(WatchProvider {
                provider_id: platform.provider_id(),
                region: DEFAULT_REGION.to_string(),
            }),
            ..Self::default()
        }
    }

    /// Personalized query: the first two mappable favorite genres, by popularity
    ///
    /// Filters on genre only; `with_genres` already requires every listed genre.
    pub fn for_preferences(preferences: &UserPreferences) -> Self {
        let genre_ids = genres::genre_ids(&preferences.favorite_genres)
            .into_iter()
            .take(DISCOVER_GENRE_LIMIT)
            .collect();

        Self::by_genres(genre_ids)
    }

    /// Genre-filtered queries follow one user's taste; provider queries
    /// are the same for everyone
    pub fn is_personalized(&self) -> bool {
        !self.genre_ids.is_empty()
    }

    /// Query-string parameters, without the API key
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.genre_ids.is_empty() {
            let ids: Vec<String> = self.genre_ids.iter().map(u32::to_string).collect();
            params.push(("with_genres", ids.join(",")));
        }
        if let Some(provider) = &self.provider {
            params.push(("with_watch_providers", provider.provider_id.to_string()));
            params.push(("watch_region", provider.region.clone()));
        }
        params.push(("sort_by", self.sort_by.clone()));
        params.push(("page", self.page.to_string()));

        params
    }
}
