//! TMDB (The Movie Database) catalog provider
//!
//! Every list route returns the same `{ page, results[] }` envelope, so all
//! four operations funnel through one request path. The shared rails (now
//! playing, upcoming, popular, per-platform discover) can be cached in Redis;
//! genre discover queries built from one user's library always go upstream.
//! The cache is read-through and never fails a request.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, TmdbMovieItem, TmdbPagedResponse},
    services::catalog::{CatalogProvider, DiscoverQuery},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

const LIST_CACHE_TTL: u64 = 3600; // 1 hour

const NOW_PLAYING_ROUTE: &str = "movie/now_playing";
const UPCOMING_ROUTE: &str = "movie/upcoming";
const POPULAR_ROUTE: &str = "movie/popular";
const DISCOVER_ROUTE: &str = "discover/movie";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: None,
        })
    }

    /// Enables response caching for the non-personalized list routes
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn fetch_list(
        &self,
        route: &str,
        params: Vec<(&str, String)>,
        cache: Option<&Cache>,
    ) -> AppResult<Vec<Movie>> {
        cached!(
            cache,
            CacheKey::catalog_list(route, &params),
            LIST_CACHE_TTL,
            async { self.request_list(route, &params).await }
        )
    }

    async fn request_list(&self, route: &str, params: &[(&str, String)]) -> AppResult<Vec<Movie>> {
        let url = format!("{}/{}", self.api_url, route);

        tracing::debug!(route = %route, params = ?params, "Fetching from TMDB");

        // The API key travels in the query string, keep it out of error messages
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                route = %route,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {} for {}",
                status, route
            )));
        }

        let page: TmdbPagedResponse = response
            .json()
            .await
            .map_err(|e| AppError::HttpClient(e.without_url()))?;
        let movies = Self::to_movies(page.results);

        tracing::info!(
            route = %route,
            page = page.page,
            results = movies.len(),
            provider = "tmdb",
            "Catalog list fetched"
        );

        Ok(movies)
    }

    /// Cache for a discover query; per-user genre queries are never cached
    fn discover_cache(&self, query: &DiscoverQuery) -> Option<&Cache> {
        if query.is_personalized() {
            None
        } else {
            self.cache.as_ref()
        }
    }

    /// Maps wire records, skipping ids that do not fit the domain's id type
    fn to_movies(items: Vec<TmdbMovieItem>) -> Vec<Movie> {
        items
            .into_iter()
            .filter_map(|item| match Movie::try_from(item) {
                Ok(movie) => Some(movie),
                Err(id) => {
                    tracing::warn!(tmdb_id = id, "Skipping movie with out-of-range id");
                    None
                }
            })
            .collect()
    }
}

fn page_params(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string())]
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn now_playing(&self, page: u32) -> AppResult<Vec<Movie>> {
        self.fetch_list(NOW_PLAYING_ROUTE, page_params(page), self.cache.as_ref())
            .await
    }

    async fn upcoming(&self, page: u32) -> AppResult<Vec<Movie>> {
        self.fetch_list(UPCOMING_ROUTE, page_params(page), self.cache.as_ref())
            .await
    }

    async fn popular(&self, page: u32) -> AppResult<Vec<Movie>> {
        self.fetch_list(POPULAR_ROUTE, page_params(page), self.cache.as_ref())
            .await
    }

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<Movie>> {
        self.fetch_list(DISCOVER_ROUTE, query.to_params(), self.discover_cache(query))
            .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
