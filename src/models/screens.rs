use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Movie, UserMovie, DEFAULT_DISPLAY_NAME};

/// Progress of one home refresh cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// Every rail is populated, but at least one fell back
    Degraded,
}

/// A horizontally scrolled list on the home screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rail {
    WatchHistory,
    Recommendations,
    NewReleases,
    Upcoming,
}

impl Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rail::WatchHistory => write!(f, "watch_history"),
            Rail::Recommendations => write!(f, "recommendations"),
            Rail::NewReleases => write!(f, "new_releases"),
            Rail::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Why a rail shows fallback content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RailFailure {
    pub rail: Rail,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeState {
    pub status: RefreshStatus,
    pub user_name: String,
    pub watch_history: Vec<Movie>,
    pub recommendations: Vec<Movie>,
    pub new_releases: Vec<Movie>,
    pub upcoming_movies: Vec<Movie>,
    #[serde(default)]
    pub failures: Vec<RailFailure>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            status: RefreshStatus::Idle,
            user_name: DEFAULT_DISPLAY_NAME.to_string(),
            watch_history: Vec::new(),
            recommendations: Vec::new(),
            new_releases: Vec::new(),
            upcoming_movies: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl HomeState {
    pub fn loading(user_name: impl Into<String>) -> Self {
        Self {
            status: RefreshStatus::Loading,
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == RefreshStatus::Degraded
    }
}

/// Streaming service a trending list is filtered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamingPlatform {
    #[default]
    Netflix,
    AmazonPrimeVideo,
    DisneyPlus,
    Hulu,
    MxPlayer,
}

impl StreamingPlatform {
    pub const ALL: [StreamingPlatform; 5] = [
        StreamingPlatform::Netflix,
        StreamingPlatform::AmazonPrimeVideo,
        StreamingPlatform::DisneyPlus,
        StreamingPlatform::Hulu,
        StreamingPlatform::MxPlayer,
    ];

    /// TMDB watch provider id
    pub fn provider_id(self) -> u32 {
        match self {
            StreamingPlatform::Netflix => 8,
            StreamingPlatform::AmazonPrimeVideo => 9,
            StreamingPlatform::DisneyPlus => 337,
            StreamingPlatform::Hulu => 15,
            StreamingPlatform::MxPlayer => 515,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StreamingPlatform::Netflix => "Netflix",
            StreamingPlatform::AmazonPrimeVideo => "Amazon Prime Video",
            StreamingPlatform::DisneyPlus => "Disney Plus",
            StreamingPlatform::Hulu => "Hulu",
            StreamingPlatform::MxPlayer => "MX Player",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingState {
    pub loading: bool,
    pub platform: StreamingPlatform,
    pub items: Vec<Movie>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Default for TrendingState {
    fn default() -> Self {
        Self {
            loading: true,
            platform: StreamingPlatform::default(),
            items: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MyMoviesState {
    pub loading: bool,
    pub watchlist: Vec<UserMovie>,
    pub watched: Vec<UserMovie>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Default for MyMoviesState {
    fn default() -> Self {
        Self {
            loading: true,
            watchlist: Vec::new(),
            watched: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileState {
    pub loading: bool,
    pub user_id: String,
    pub user_name: String,
    pub watched_count: usize,
    pub watchlist_count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            loading: true,
            user_id: String::new(),
            user_name: DEFAULT_DISPLAY_NAME.to_string(),
            watched_count: 0,
            watchlist_count: 0,
            error: None,
        }
    }
}
