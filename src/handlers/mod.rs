pub mod catalog;
pub mod common;
pub mod index;
pub mod merchandising;

use crate::config::AppConfig;
use crate::services::{
    catalog::{
        ArticleService, CategoryService, ConfigurationService, FilterService, ImageService,
        MediaStore,
    },
    merchandising::{CarouselService, ContentBlockService, NavigationLinkService},
};
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub articles: Arc<ArticleService>,
    pub images: Arc<ImageService>,
    pub filters: Arc<FilterService>,
    pub configuration: Arc<ConfigurationService>,
    pub carousels: Arc<CarouselService>,
    pub navigation_links: Arc<NavigationLinkService>,
    pub content_blocks: Arc<ContentBlockService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, media: MediaStore) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db.clone())),
            articles: Arc::new(ArticleService::new(db.clone())),
            images: Arc::new(ImageService::new(db.clone(), media)),
            filters: Arc::new(FilterService::new(db.clone())),
            configuration: Arc::new(ConfigurationService::new(db.clone())),
            carousels: Arc::new(CarouselService::new(db.clone())),
            navigation_links: Arc::new(NavigationLinkService::new(db.clone())),
            content_blocks: Arc::new(ContentBlockService::new(db)),
        }
    }

    /// Builds the services with the media store described by `config`.
    pub fn from_config(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let media = MediaStore::new(
            config.media_root_path(),
            config.media_url.clone(),
            config.max_upload_size,
        );
        Self::new(db, media)
    }
}

/// Read endpoints open to the storefront.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(index::public_routes())
        .merge(catalog::public_routes())
        .merge(merchandising::public_routes())
}

/// Everything under `/api/admin`; callers add the token guard.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(index::admin_routes())
        .merge(catalog::admin_routes())
        .merge(merchandising::admin_routes())
}
