use std::sync::Arc;

use crate::services::{
    CatalogProvider, HomeScreen, LibraryStore, MyMoviesScreen, ProfileScreen,
    RecommendationService, TrendingScreen,
};

/// Shared application state
///
/// Holds the long-lived services. Screen state holders are cheap and are
/// built per request, so one user's snapshot is never served to another.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub library: Arc<dyn LibraryStore>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, library: Arc<dyn LibraryStore>) -> Self {
        let recommendations = Arc::new(RecommendationService::new(
            catalog.clone(),
            library.clone(),
        ));

        Self {
            catalog,
            library,
            recommendations,
        }
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(self.recommendations.clone(), self.library.clone())
    }

    pub fn trending_screen(&self) -> TrendingScreen {
        TrendingScreen::new(self.catalog.clone())
    }

    pub fn my_movies_screen(&self) -> MyMoviesScreen {
        MyMoviesScreen::new(self.library.clone())
    }

    pub fn profile_screen(&self) -> ProfileScreen {
        ProfileScreen::new(self.library.clone())
    }
}
