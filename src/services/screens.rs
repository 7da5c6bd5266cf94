//! Observable per-screen state
//!
//! Each holder publishes whole snapshots through a `tokio::sync::watch`
//! channel: a loading snapshot when work starts, then the result. Renderers
//! subscribe and redraw on change; nothing is patched in place.
use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::{
        HomeState, Movie, MyMoviesState, ProfileState, Session, StreamingPlatform, TrendingState,
    },
    services::{
        catalog::{CatalogProvider, DiscoverQuery},
        library::LibraryStore,
        recommendations::RecommendationService,
    },
};

/// Trending rows shown per platform
pub const TRENDING_SIZE: usize = 20;

pub struct HomeScreen {
    recommendations: Arc<RecommendationService>,
    library: Arc<dyn LibraryStore>,
    state: watch::Sender<HomeState>,
}

impl HomeScreen {
    pub fn new(
        recommendations: Arc<RecommendationService>,
        library: Arc<dyn LibraryStore>,
    ) -> Self {
        Self {
            recommendations,
            library,
            state: watch::Sender::new(HomeState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> HomeState {
        self.state.borrow().clone()
    }

    pub async fn refresh(&self, session: &Session) -> HomeState {
        self.state
            .send_replace(HomeState::loading(session.display_name.clone()));

        let state = self.recommendations.refresh(session).await;
        self.state.send_replace(state.clone());
        state
    }

    /// Adds to watched, then rebuilds every rail
    pub async fn add_to_watched(&self, session: &Session, movie: &Movie) -> AppResult<HomeState> {
        self.library.add_to_watched(&session.user_id, movie).await?;
        Ok(self.refresh(session).await)
    }

    /// Adds to the watchlist, then rebuilds every rail
    pub async fn add_to_watchlist(
        &self,
        session: &Session,
        movie: &Movie,
    ) -> AppResult<HomeState> {
        self.library.add_to_watchlist(&session.user_id, movie).await?;
        Ok(self.refresh(session).await)
    }

    pub async fn mark_watched(&self, session: &Session, movie_id: i32) -> AppResult<HomeState> {
        self.library
            .mark_watched(&session.user_id, movie_id)
            .await?
            .ok_or_else(|| not_in_library(movie_id))?;
        Ok(self.refresh(session).await)
    }
}

pub struct TrendingScreen {
    catalog: Arc<dyn CatalogProvider>,
    state: watch::Sender<TrendingState>,
}

impl TrendingScreen {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            catalog,
            state: watch::Sender::new(TrendingState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrendingState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> TrendingState {
        self.state.borrow().clone()
    }

    /// Popular movies on one streaming platform; a failed lookup shows no rows
    pub async fn load_for_platform(&self, platform: StreamingPlatform) -> TrendingState {
        self.state.send_modify(|state| {
            state.loading = true;
            state.platform = platform;
        });

        let state = match self
            .catalog
            .discover(&DiscoverQuery::by_platform(platform))
            .await
        {
            Ok(movies) => TrendingState {
                loading: false,
                platform,
                items: movies.into_iter().take(TRENDING_SIZE).collect(),
                error: None,
            },
            Err(e) => {
                tracing::warn!(
                    platform = platform.display_name(),
                    error = %e,
                    "Trending lookup failed"
                );
                TrendingState {
                    loading: false,
                    platform,
                    items: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        self.state.send_replace(state.clone());
        state
    }
}

pub struct MyMoviesScreen {
    library: Arc<dyn LibraryStore>,
    state: watch::Sender<MyMoviesState>,
}

impl MyMoviesScreen {
    pub fn new(library: Arc<dyn LibraryStore>) -> Self {
        Self {
            library,
            state: watch::Sender::new(MyMoviesState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MyMoviesState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> MyMoviesState {
        self.state.borrow().clone()
    }

    pub async fn refresh(&self, session: &Session) -> AppResult<MyMoviesState> {
        self.state.send_modify(|state| state.loading = true);

        let loaded = async {
            let watchlist = self.library.watchlist(&session.user_id).await?;
            let watched = self.library.watched(&session.user_id).await?;
            Ok::<_, AppError>((watchlist, watched))
        }
        .await;

        match loaded {
            Ok((watchlist, watched)) => {
                let state = MyMoviesState {
                    loading: false,
                    watchlist,
                    watched,
                    error: None,
                };
                self.state.send_replace(state.clone());
                Ok(state)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn add_to_watchlist(
        &self,
        session: &Session,
        movie: &Movie,
    ) -> AppResult<MyMoviesState> {
        let written = self.library.add_to_watchlist(&session.user_id, movie).await;
        self.after_write(session, written).await
    }

    pub async fn add_to_watched(
        &self,
        session: &Session,
        movie: &Movie,
    ) -> AppResult<MyMoviesState> {
        let written = self.library.add_to_watched(&session.user_id, movie).await;
        self.after_write(session, written).await
    }

    /// Adds a movie typed in by the user rather than picked from the catalog
    pub async fn add_local(
        &self,
        session: &Session,
        title: &str,
        genres: Vec<String>,
        watched: bool,
    ) -> AppResult<MyMoviesState> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Movie title cannot be empty".to_string()));
        }

        let movie = Movie::local(title, genres);
        if let Some(existing) = self
            .library
            .get(&session.user_id, movie.id)
            .await
            .map_err(|e| self.fail(e))?
        {
            if !existing.title.eq_ignore_ascii_case(&movie.title) {
                return Err(self.fail(AppError::Conflict(format!(
                    "'{}' cannot be added while '{}' is in the library",
                    movie.title, existing.title
                ))));
            }
        }

        if watched {
            self.add_to_watched(session, &movie).await
        } else {
            self.add_to_watchlist(session, &movie).await
        }
    }

    pub async fn mark_watched(&self, session: &Session, movie_id: i32) -> AppResult<MyMoviesState> {
        let written = match self.library.mark_watched(&session.user_id, movie_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => return Err(not_in_library(movie_id)),
            Err(e) => Err(e),
        };
        self.after_write(session, written).await
    }

    pub async fn remove_from_watchlist(
        &self,
        session: &Session,
        movie_id: i32,
    ) -> AppResult<MyMoviesState> {
        let removed = self
            .library
            .remove_from_watchlist(&session.user_id, movie_id)
            .await;
        self.after_remove(session, movie_id, removed).await
    }

    pub async fn remove_from_watched(
        &self,
        session: &Session,
        movie_id: i32,
    ) -> AppResult<MyMoviesState> {
        let removed = self
            .library
            .remove_from_watched(&session.user_id, movie_id)
            .await;
        self.after_remove(session, movie_id, removed).await
    }

    pub async fn clear(&self, session: &Session) -> AppResult<u64> {
        let removed = self
            .library
            .clear(&session.user_id)
            .await
            .map_err(|e| self.fail(e))?;
        self.refresh(session).await?;
        Ok(removed)
    }

    async fn after_write<T>(
        &self,
        session: &Session,
        written: AppResult<T>,
    ) -> AppResult<MyMoviesState> {
        written.map_err(|e| self.fail(e))?;
        self.refresh(session).await
    }

    async fn after_remove(
        &self,
        session: &Session,
        movie_id: i32,
        removed: AppResult<bool>,
    ) -> AppResult<MyMoviesState> {
        if !removed.map_err(|e| self.fail(e))? {
            return Err(not_in_library(movie_id));
        }
        self.refresh(session).await
    }

    /// Publishes the error on the screen and hands it back to the caller
    fn fail(&self, error: AppError) -> AppError {
        tracing::warn!(error = %error, "Library operation failed");
        self.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(error.to_string());
        });
        error
    }
}

pub struct ProfileScreen {
    library: Arc<dyn LibraryStore>,
    state: watch::Sender<ProfileState>,
}

impl ProfileScreen {
    pub fn new(library: Arc<dyn LibraryStore>) -> Self {
        Self {
            library,
            state: watch::Sender::new(ProfileState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub async fn refresh(&self, session: &Session) -> AppResult<ProfileState> {
        let counts = async {
            let watched = self.library.watched(&session.user_id).await?.len();
            let watchlist = self.library.watchlist(&session.user_id).await?.len();
            Ok::<_, AppError>((watched, watchlist))
        }
        .await;

        let mut state = ProfileState {
            loading: false,
            user_id: session.user_id.clone(),
            user_name: session.display_name.clone(),
            ..ProfileState::default()
        };

        match counts {
            Ok((watched_count, watchlist_count)) => {
                state.watched_count = watched_count;
                state.watchlist_count = watchlist_count;
                self.state.send_replace(state.clone());
                Ok(state)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                self.state.send_replace(state);
                Err(e)
            }
        }
    }
}

fn not_in_library(movie_id: i32) -> AppError {
    AppError::NotFound(format!("Movie {} is not in the library", movie_id))
}
