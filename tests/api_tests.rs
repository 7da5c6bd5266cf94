use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use movielens_api::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    models::Movie,
    services::{catalog::DiscoverQuery, CatalogProvider, MemoryLibraryStore},
};

/// Canned catalog; `upcoming_fails` simulates an outage of that one endpoint
struct StubCatalog {
    upcoming_fails: bool,
}

fn movie(id: i32, title: &str, genres: &[&str]) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        overview: Some(format!("About {}", title)),
        release_date: Some("2015-05-13".to_string()),
        vote_average: Some(7.6),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StubCatalog {
    async fn now_playing(&self, _page: u32) -> AppResult<Vec<Movie>> {
        Ok(vec![movie(1, "Now Showing", &["Drama"])])
    }

    async fn upcoming(&self, _page: u32) -> AppResult<Vec<Movie>> {
        if self.upcoming_fails {
            return Err(AppError::ExternalApi("TMDB returned status 503".to_string()));
        }
        Ok(vec![movie(2, "Coming Soon", &["Horror"])])
    }

    async fn popular(&self, _page: u32) -> AppResult<Vec<Movie>> {
        Ok(vec![movie(3, "Crowd Pleaser", &["Comedy"])])
    }

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<Vec<Movie>> {
        if query.provider.is_some() {
            return Ok(vec![movie(4, "Streaming Hit", &["Thriller"])]);
        }
        Ok(vec![movie(5, "Picked For You", &["Action"])])
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn create_test_server_with(upcoming_fails: bool) -> TestServer {
    let state = AppState::new(
        Arc::new(StubCatalog { upcoming_fails }),
        Arc::new(MemoryLibraryStore::new()),
    );
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(false)
}

fn user_header(user_id: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_static(user_id),
    )
}

fn mad_max() -> Value {
    json!({
        "id": 76341,
        "title": "Mad Max: Fury Road",
        "poster_path": "/8tZYtuWezp8JbcsvHYO0O46tFbo.jpg",
        "overview": "An apocalyptic story set in the furthest reaches of our planet.",
        "release_date": "2015-05-13",
        "vote_average": 7.6,
        "genres": ["Action", "Adventure", "Science Fiction"]
    })
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let server = create_test_server();
    let response = server.get("/api/v1/home").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn test_home_with_empty_library() {
    let server = create_test_server();
    let (name, value) = user_header("alice");

    let response = server
        .get("/api/v1/home")
        .add_header(name, value)
        .add_header(
            HeaderName::from_static("x-user-name"),
            HeaderValue::from_static("Alice"),
        )
        .await;

    response.assert_status_ok();
    let home: Value = response.json();
    assert_eq!(home["status"], "success");
    assert_eq!(home["user_name"], "Alice");
    assert_eq!(home["watch_history"].as_array().unwrap().len(), 0);
    assert_eq!(home["recommendations"][0]["title"], "Crowd Pleaser");
    assert_eq!(home["new_releases"][0]["title"], "Now Showing");
    assert_eq!(home["upcoming_movies"][0]["title"], "Coming Soon");
}

#[tokio::test]
async fn test_upcoming_failure_degrades_one_rail() {
    let server = create_test_server_with(true);
    let (name, value) = user_header("alice");

    let response = server.get("/api/v1/home").add_header(name, value).await;

    response.assert_status_ok();
    let home: Value = response.json();
    assert_eq!(home["status"], "degraded");
    assert_eq!(home["upcoming_movies"].as_array().unwrap().len(), 0);
    assert_eq!(home["new_releases"].as_array().unwrap().len(), 1);
    assert_eq!(home["failures"].as_array().unwrap().len(), 1);
    assert_eq!(home["failures"][0]["rail"], "upcoming");
}

#[tokio::test]
async fn test_watchlist_round_trip() {
    let server = create_test_server();
    let (name, value) = user_header("bob");

    let response = server
        .post("/api/v1/library/watchlist")
        .add_header(name.clone(), value.clone())
        .json(&mad_max())
        .await;
    response.assert_status_ok();

    let response = server.get("/api/v1/library").add_header(name, value).await;
    response.assert_status_ok();
    let library: Value = response.json();

    let watchlist = library["watchlist"].as_array().unwrap();
    assert_eq!(watchlist.len(), 1);
    assert_eq!(watchlist[0]["movie_id"], 76341);
    assert_eq!(watchlist[0]["title"], "Mad Max: Fury Road");
    assert_eq!(watchlist[0]["release_date"], "2015-05-13");
    assert_eq!(watchlist[0]["vote_average"], 7.6);
    assert_eq!(watchlist[0]["genres"][2], "Science Fiction");
    assert_eq!(watchlist[0]["status"], "watchlisted");
    assert_eq!(library["watched"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_mark_watched_twice_keeps_one_record() {
    let server = create_test_server();
    let (name, value) = user_header("carol");

    server
        .post("/api/v1/library/watchlist")
        .add_header(name.clone(), value.clone())
        .json(&mad_max())
        .await
        .assert_status_ok();

    for _ in 0..2 {
        let response = server
            .post("/api/v1/library/76341/watched")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();
        let home: Value = response.json();
        assert_eq!(home["watch_history"].as_array().unwrap().len(), 1);
        assert_eq!(home["recommendations"][0]["title"], "Picked For You");
    }

    let library: Value = server
        .get("/api/v1/library")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(library["watched"].as_array().unwrap().len(), 1);
    assert_eq!(library["watchlist"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_mark_watched_unknown_movie_is_not_found() {
    let server = create_test_server();
    let (name, value) = user_header("dave");

    let response = server
        .post("/api/v1/library/999/watched")
        .add_header(name, value)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_from_lists() {
    let server = create_test_server();
    let (name, value) = user_header("erin");

    server
        .post("/api/v1/library/watched")
        .add_header(name.clone(), value.clone())
        .json(&mad_max())
        .await
        .assert_status_ok();

    // The movie is on the watched list, not the watchlist
    server
        .delete("/api/v1/library/watchlist/76341")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete("/api/v1/library/watched/76341")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/v1/library/watched/76341")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let server = create_test_server();
    let (name, value) = user_header("frank");

    let mut body = mad_max();
    body["title"] = json!("  ");

    let response = server
        .post("/api/v1/library/watched")
        .add_header(name.clone(), value.clone())
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/library/local")
        .add_header(name, value)
        .json(&json!({ "title": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_local_movie() {
    let server = create_test_server();
    let (name, value) = user_header("grace");

    let response = server
        .post("/api/v1/library/local")
        .add_header(name, value)
        .json(&json!({ "title": "Family Reunion 2019", "genres": ["Documentary"], "watched": true }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let library: Value = response.json();
    let watched = library["watched"].as_array().unwrap();
    assert_eq!(watched.len(), 1);
    assert!(watched[0]["movie_id"].as_i64().unwrap() < 0);
    assert!(watched[0]["poster_path"].is_null());
}

#[tokio::test]
async fn test_preferences_and_profile() {
    let server = create_test_server();
    let (name, value) = user_header("heidi");

    server
        .post("/api/v1/library/watched")
        .add_header(name.clone(), value.clone())
        .json(&mad_max())
        .await
        .assert_status_ok();

    let preferences: Value = server
        .get("/api/v1/preferences")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(
        preferences["favorite_genres"],
        json!(["Action", "Adventure", "Science Fiction"])
    );

    let profile: Value = server
        .get("/api/v1/profile")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(profile["user_id"], "heidi");
    assert_eq!(profile["user_name"], "User");
    assert_eq!(profile["watched_count"], 1);
    assert_eq!(profile["watchlist_count"], 0);
}

#[tokio::test]
async fn test_libraries_are_isolated_per_user() {
    let server = create_test_server();
    let (name, ivan) = user_header("ivan");
    let (_, judy) = user_header("judy");

    server
        .post("/api/v1/library/watchlist")
        .add_header(name.clone(), ivan.clone())
        .json(&mad_max())
        .await
        .assert_status_ok();

    let library: Value = server
        .get("/api/v1/library")
        .add_header(name.clone(), judy.clone())
        .await
        .json();
    assert_eq!(library["watchlist"].as_array().unwrap().len(), 0);

    let cleared: Value = server
        .delete("/api/v1/library")
        .add_header(name, ivan)
        .await
        .json();
    assert_eq!(cleared["removed"], 1);
}

#[tokio::test]
async fn test_trending_by_platform() {
    let server = create_test_server();

    let response = server.get("/api/v1/trending?platform=disney_plus").await;
    response.assert_status_ok();
    let trending: Value = response.json();
    assert_eq!(trending["platform"], "disney_plus");
    assert_eq!(trending["items"][0]["title"], "Streaming Hit");

    let trending: Value = server.get("/api/v1/trending").await.json();
    assert_eq!(trending["platform"], "netflix");
}

#[tokio::test]
async fn test_trending_platform_tabs() {
    let server = create_test_server();

    let response = server.get("/api/v1/trending/platforms").await;
    response.assert_status_ok();
    let platforms: Vec<Value> = response.json();

    assert_eq!(platforms.len(), 5);
    assert_eq!(platforms[0]["platform"], "netflix");
    assert_eq!(platforms[0]["provider_id"], 8);
    assert_eq!(platforms[4]["name"], "MX Player");
    assert_eq!(platforms[4]["provider_id"], 515);
}

#[tokio::test]
async fn test_rail_items_carry_poster_urls() {
    let server = create_test_server();
    let (name, value) = user_header("kim");

    let home: Value = server.get("/api/v1/home").add_header(name, value).await.json();
    assert_eq!(
        home["new_releases"][0]["poster_url"],
        "https://image.tmdb.org/t/p/w500/1.jpg"
    );
}
