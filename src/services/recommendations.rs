use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{HomeState, Movie, Rail, RailFailure, RefreshStatus, Session, UserMovie, UserPreferences},
    services::{
        catalog::{CatalogProvider, DiscoverQuery},
        library::LibraryStore,
        preferences::build_preferences,
    },
};

/// Movies per catalog rail
pub const RAIL_SIZE: usize = 6;
/// Most recent watched movies shown on the home screen
pub const HISTORY_SIZE: usize = 6;

/// A user's two lists, loaded together for one refresh
struct Library {
    watched: Vec<UserMovie>,
    watchlist: Vec<UserMovie>,
}

impl Library {
    fn movies(&self) -> Vec<Movie> {
        self.watched
            .iter()
            .chain(self.watchlist.iter())
            .map(UserMovie::to_movie)
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.watched.is_empty() && self.watchlist.is_empty()
    }
}

/// Assembles the four home-screen rails
///
/// Catalog calls run one after another. A failing step never fails the
/// refresh: its rail falls back (see `refresh`), the failure is recorded in
/// `HomeState::failures`, and the state is marked `Degraded`.
pub struct RecommendationService {
    catalog: Arc<dyn CatalogProvider>,
    library: Arc<dyn LibraryStore>,
}

impl RecommendationService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, library: Arc<dyn LibraryStore>) -> Self {
        Self { catalog, library }
    }

    /// Runs one full refresh cycle for the session's user
    ///
    /// Fallbacks, per rail:
    /// - library unreadable: empty history, recommendations from popular
    /// - new releases: a fixed list of recent hits
    /// - personalized recommendations: popular movies
    /// - popular: a fixed list of classics
    /// - upcoming: empty
    pub async fn refresh(&self, session: &Session) -> HomeState {
        let user_id = session.user_id.as_str();
        let mut failures = Vec::new();

        tracing::info!(
            user_id = %user_id,
            catalog = self.catalog.name(),
            library = self.library.name(),
            "Refreshing home rails"
        );

        let library = match self.load_library(user_id).await {
            Ok(library) => Some(library),
            Err(e) => {
                record_failure(&mut failures, Rail::WatchHistory, &e);
                None
            }
        };

        let new_releases = match self.catalog.now_playing(1).await {
            Ok(movies) => take_rail(movies),
            Err(e) => {
                record_failure(&mut failures, Rail::NewReleases, &e);
                fallback_new_releases()
            }
        };

        let recommendations = self.recommend(library.as_ref(), &mut failures).await;

        let upcoming_movies = match self.catalog.upcoming(1).await {
            Ok(movies) => take_rail(movies),
            Err(e) => {
                record_failure(&mut failures, Rail::Upcoming, &e);
                Vec::new()
            }
        };

        let watch_history: Vec<Movie> = library
            .map(|library| {
                library
                    .watched
                    .iter()
                    .take(HISTORY_SIZE)
                    .map(UserMovie::to_movie)
                    .collect()
            })
            .unwrap_or_default();

        let status = if failures.is_empty() {
            RefreshStatus::Success
        } else {
            RefreshStatus::Degraded
        };

        tracing::info!(
            user_id = %user_id,
            status = ?status,
            history = watch_history.len(),
            recommendations = recommendations.len(),
            new_releases = new_releases.len(),
            upcoming = upcoming_movies.len(),
            "Home rails refreshed"
        );

        HomeState {
            status,
            user_name: session.display_name.clone(),
            watch_history,
            recommendations,
            new_releases,
            upcoming_movies,
            failures,
        }
    }

    /// Preference profile of the session's user
    pub async fn preferences(&self, session: &Session) -> AppResult<UserPreferences> {
        let library = self.load_library(&session.user_id).await?;
        Ok(build_preferences(&library.movies()))
    }

    async fn load_library(&self, user_id: &str) -> AppResult<Library> {
        let watched = self.library.watched(user_id).await?;
        let watchlist = self.library.watchlist(user_id).await?;
        Ok(Library { watched, watchlist })
    }

    async fn recommend(
        &self,
        library: Option<&Library>,
        failures: &mut Vec<RailFailure>,
    ) -> Vec<Movie> {
        if let Some(library) = library.filter(|l| !l.is_empty()) {
            let preferences = build_preferences(&library.movies());
            let query = DiscoverQuery::for_preferences(&preferences);

            tracing::debug!(
                favorite_genres = ?preferences.favorite_genres,
                genre_ids = ?query.genre_ids,
                "Discovering personalized recommendations"
            );

            match self.catalog.discover(&query).await {
                Ok(movies) if !movies.is_empty() => return take_rail(movies),
                Ok(_) => tracing::debug!("No personalized matches, using popular movies"),
                Err(e) => record_failure(failures, Rail::Recommendations, &e),
            }
        }

        match self.catalog.popular(1).await {
            Ok(movies) if !movies.is_empty() => take_rail(movies),
            Ok(_) => fallback_popular(),
            Err(e) => {
                record_failure(failures, Rail::Recommendations, &e);
                fallback_popular()
            }
        }
    }
}

fn take_rail(movies: Vec<Movie>) -> Vec<Movie> {
    movies.into_iter().take(RAIL_SIZE).collect()
}

fn record_failure(failures: &mut Vec<RailFailure>, rail: Rail, error: &AppError) {
    tracing::warn!(rail = %rail, error = %error, "Rail fell back");
    failures.push(RailFailure {
        rail,
        reason: error.to_string(),
    });
}

fn fallback_movie(id: i32, title: &str, poster_path: &str, year: &str, rating: f64) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(poster_path.to_string()),
        overview: None,
        release_date: Some(year.to_string()),
        vote_average: Some(rating),
        genres: Vec::new(),
    }
}

/// Shown in place of now-playing movies when the catalog is unreachable
pub fn fallback_new_releases() -> Vec<Movie> {
    vec![
        fallback_movie(693134, "Dune: Part Two", "/8b8R8l88Qje9dn9OE8PY05Nxl1X.jpg", "2024", 8.5),
        fallback_movie(872585, "Oppenheimer", "/8Gxv8gSFCU0XGDykEGv7zR1n2ua.jpg", "2023", 8.3),
    ]
}

/// Shown in place of popular movies when the catalog is unreachable
pub fn fallback_popular() -> Vec<Movie> {
    vec![
        fallback_movie(155, "The Dark Knight", "/qJ2tW6WMUDux911r6m7haRef0WH.jpg", "2008", 9.0),
        fallback_movie(680, "Pulp Fiction", "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg", "1994", 8.9),
    ]
}
