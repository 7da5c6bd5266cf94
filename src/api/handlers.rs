use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        HomeState, Movie, MyMoviesState, ProfileState, Session, StreamingPlatform,
        TrendingState, UserPreferences,
    },
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    pub platform: StreamingPlatform,
}

#[derive(Debug, Deserialize)]
pub struct AddLocalMovieRequest {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub watched: bool,
}

// Response types

/// One tab of the trending screen
#[derive(Debug, Serialize)]
pub struct PlatformResponse {
    pub platform: StreamingPlatform,
    pub name: &'static str,
    pub provider_id: u32,
}

impl From<StreamingPlatform> for PlatformResponse {
    fn from(platform: StreamingPlatform) -> Self {
        Self {
            platform,
            name: platform.display_name(),
            provider_id: platform.provider_id(),
        }
    }
}

fn validate_movie(movie: &Movie) -> AppResult<()> {
    if movie.title.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Refreshes every home rail for the caller
pub async fn home(State(state): State<AppState>, session: Session) -> Json<HomeState> {
    Json(state.home_screen().refresh(&session).await)
}

pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Json<TrendingState> {
    Json(state.trending_screen().load_for_platform(query.platform).await)
}

/// Streaming platforms the trending screen can filter by
pub async fn platforms() -> Json<Vec<PlatformResponse>> {
    Json(
        StreamingPlatform::ALL
            .into_iter()
            .map(PlatformResponse::from)
            .collect(),
    )
}

pub async fn library(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<MyMoviesState>> {
    let screen = state.my_movies_screen();
    Ok(Json(screen.refresh(&session).await?))
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    session: Session,
    Json(movie): Json<Movie>,
) -> AppResult<Json<HomeState>> {
    validate_movie(&movie)?;
    let home = state.home_screen();
    Ok(Json(home.add_to_watchlist(&session, &movie).await?))
}

pub async fn add_to_watched(
    State(state): State<AppState>,
    session: Session,
    Json(movie): Json<Movie>,
) -> AppResult<Json<HomeState>> {
    validate_movie(&movie)?;
    let home = state.home_screen();
    Ok(Json(home.add_to_watched(&session, &movie).await?))
}

/// Adds a movie the user typed in by hand
pub async fn add_local(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddLocalMovieRequest>,
) -> AppResult<(StatusCode, Json<MyMoviesState>)> {
    let screen = state.my_movies_screen();
    let movies = screen
        .add_local(&session, &request.title, request.genres, request.watched)
        .await?;
    Ok((StatusCode::CREATED, Json(movies)))
}

pub async fn mark_watched(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<i32>,
) -> AppResult<Json<HomeState>> {
    let home = state.home_screen();
    Ok(Json(home.mark_watched(&session, movie_id).await?))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .my_movies_screen()
        .remove_from_watchlist(&session, movie_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_from_watched(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .my_movies_screen()
        .remove_from_watched(&session, movie_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_library(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Value>> {
    let removed = state.my_movies_screen().clear(&session).await?;
    tracing::info!(user_id = %session.user_id, removed, "Library cleared");
    Ok(Json(json!({ "removed": removed })))
}

/// Preference profile derived from the caller's library
pub async fn preferences(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<UserPreferences>> {
    Ok(Json(state.recommendations.preferences(&session).await?))
}

pub async fn profile(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ProfileState>> {
    let screen = state.profile_screen();
    Ok(Json(screen.refresh(&session).await?))
}
