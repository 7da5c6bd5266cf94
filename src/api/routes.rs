use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::{make_request_span, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Screens
        .route("/home", get(handlers::home))
        .route("/trending", get(handlers::trending))
        .route("/trending/platforms", get(handlers::platforms))
        .route("/preferences", get(handlers::preferences))
        .route("/profile", get(handlers::profile))
        // Library
        .route(
            "/library",
            get(handlers::library).delete(handlers::clear_library),
        )
        .route("/library/local", post(handlers::add_local))
        .route("/library/watchlist", post(handlers::add_to_watchlist))
        .route("/library/watched", post(handlers::add_to_watched))
        .route("/library/:movie_id/watched", post(handlers::mark_watched))
        .route(
            "/library/watchlist/:movie_id",
            delete(handlers::remove_from_watchlist),
        )
        .route(
            "/library/watched/:movie_id",
            delete(handlers::remove_from_watched),
        )
}
