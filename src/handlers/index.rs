use crate::{handlers::common::RouterExt, AppState};
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Resources served by the public API, by name.
pub const PUBLIC_RESOURCES: [(&str, &str); 5] = [
    ("categorias", "/api/categorias/"),
    ("articulos", "/api/articulos/"),
    ("carousels", "/api/carousels/"),
    ("navigation-links", "/api/navigation-links/"),
    ("content-blocks", "/api/content-blocks/"),
];

/// Resources managed through the admin API, in menu order.
pub const ADMIN_RESOURCES: [(&str, &str); 10] = [
    ("categorias", "/api/admin/categorias/"),
    ("articulos", "/api/admin/articulos/"),
    ("imagenes", "/api/admin/imagenes/"),
    ("filtros", "/api/admin/filtros/"),
    ("filtro-valores", "/api/admin/filtro-valores/"),
    ("configuracion", "/api/admin/configuracion/"),
    ("carousels", "/api/admin/carousels/"),
    ("carousel-slides", "/api/admin/carousel-slides/"),
    ("navigation-links", "/api/admin/navigation-links/"),
    ("content-blocks", "/api/admin/content-blocks/"),
];

pub fn public_routes() -> Router<AppState> {
    Router::new().route_slash("/api", get(api_root))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route_slash("/api/admin", get(admin_index))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminResource {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminIndexResponse {
    pub site_header: String,
    pub site_title: String,
    pub resources: Vec<AdminResource>,
}

/// API root: resource name to list path
#[utoipa::path(
    get,
    path = "/api/",
    responses(
        (status = 200, description = "Map of resource names to paths", body = BTreeMap<String, String>)
    ),
    tag = "Catalog"
)]
pub async fn api_root() -> impl IntoResponse {
    let resources: BTreeMap<&str, &str> = PUBLIC_RESOURCES.into_iter().collect();
    Json(resources)
}

#[utoipa::path(
    get,
    path = "/api/admin/",
    responses(
        (status = 200, description = "Admin site strings and managed resources", body = AdminIndexResponse),
        (status = 401, description = "Missing or wrong admin token", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_index(State(state): State<AppState>) -> impl IntoResponse {
    Json(AdminIndexResponse {
        site_header: state.config.site_header.clone(),
        site_title: state.config.site_title.clone(),
        resources: ADMIN_RESOURCES
            .into_iter()
            .map(|(name, path)| AdminResource {
                name: name.to_string(),
                path: path.to_string(),
            })
            .collect(),
    })
}
