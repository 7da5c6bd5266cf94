pub mod catalog;
pub mod genres;
pub mod library;
pub mod preferences;
pub mod recommendations;
pub mod screens;

pub use catalog::{CatalogProvider, DiscoverQuery, TmdbProvider};
pub use library::{LibraryStore, MemoryLibraryStore, PgLibraryStore, RedisLibraryStore};
pub use recommendations::RecommendationService;
pub use screens::{HomeScreen, MyMoviesScreen, ProfileScreen, TrendingScreen};
