mod movie;
mod preferences;
mod screens;
mod session;
mod tmdb;

pub use movie::{ListStatus, Movie, UserMovie};
pub use preferences::UserPreferences;
pub use screens::{
    HomeState, MyMoviesState, ProfileState, Rail, RailFailure, RefreshStatus, StreamingPlatform,
    TrendingState,
};
pub use session::{Session, DEFAULT_DISPLAY_NAME};
pub use tmdb::{TmdbMovieItem, TmdbPagedResponse};
