//! Catalog endpoints: categories and articles are public, the image bank,
//! facets and settings are admin only.

pub mod articles;
pub mod categories;
pub mod configuration;
pub mod filters;
pub mod images;

use crate::AppState;
use axum::Router;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(categories::public_routes())
        .merge(articles::public_routes())
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(categories::admin_routes())
        .merge(articles::admin_routes())
        .merge(images::admin_routes())
        .merge(filters::admin_routes())
        .merge(configuration::admin_routes())
}
