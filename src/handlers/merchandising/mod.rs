//! Storefront widgets. The public API only ever exposes active rows.

pub mod carousels;
pub mod content_blocks;
pub mod navigation_links;

use crate::AppState;
use axum::Router;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(carousels::public_routes())
        .merge(navigation_links::public_routes())
        .merge(content_blocks::public_routes())
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(carousels::admin_routes())
        .merge(navigation_links::admin_routes())
        .merge(content_blocks::admin_routes())
}
