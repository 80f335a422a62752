use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, parse_choice_param, search_param,
    success_response, ApiPath, ApiQuery, JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::merchandising::{LinkLocation, NavigationLinkModel},
    errors::ApiError,
    services::merchandising::navigation::{
        NavigationLinkDraft, NavigationLinkPatch, NavigationLinkQuery,
    },
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route_slash("/api/navigation-links", get(list_links))
        .route_slash("/api/navigation-links/:id", get(get_link))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/navigation-links",
            get(admin_list_links).post(create_link),
        )
        .route_slash(
            "/api/admin/navigation-links/:id",
            get(admin_get_link)
                .put(update_link)
                .patch(patch_link)
                .delete(delete_link),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavigationLinkResponse {
    pub id: i32,
    pub texto_del_enlace: String,
    pub url_o_ruta: String,
    pub ubicacion: LinkLocation,
    pub orden: i32,
    pub abrir_en_nueva_pestana: bool,
    pub activo: bool,
}

impl From<NavigationLinkModel> for NavigationLinkResponse {
    fn from(model: NavigationLinkModel) -> Self {
        Self {
            id: model.id,
            texto_del_enlace: model.label,
            url_o_ruta: model.url,
            ubicacion: model.location,
            orden: model.sort_order,
            abrir_en_nueva_pestana: model.open_in_new_tab,
            activo: model.is_active,
        }
    }
}

/// Admin view adds the display label of the location.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminNavigationLinkResponse {
    #[serde(flatten)]
    pub link: NavigationLinkResponse,
    pub ubicacion_display: String,
}

impl From<NavigationLinkModel> for AdminNavigationLinkResponse {
    fn from(model: NavigationLinkModel) -> Self {
        Self {
            ubicacion_display: model.location.label().to_string(),
            link: model.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LinkFilterParams {
    /// One of `header`, `footer_col1`, `footer_col2`
    pub ubicacion: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminLinkListParams {
    /// Search over link text and target
    pub q: Option<String>,
    pub ubicacion: Option<String>,
    pub activo: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/navigation-links/",
    params(LinkFilterParams),
    responses(
        (status = 200, description = "Active links by location and order", body = Vec<NavigationLinkResponse>),
        (status = 400, description = "Unknown location", body = crate::errors::ErrorResponse)
    ),
    tag = "Merchandising"
)]
pub async fn list_links(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LinkFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let location = parse_choice_param::<LinkLocation>("ubicacion", params.ubicacion.as_deref())?;
    let links = state.services.navigation_links.list_active(location).await?;
    let body: Vec<NavigationLinkResponse> = links.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    get,
    path = "/api/navigation-links/{id}/",
    params(("id" = i32, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Active link", body = NavigationLinkResponse),
        (status = 404, description = "Unknown or inactive link", body = crate::errors::ErrorResponse)
    ),
    tag = "Merchandising"
)]
pub async fn get_link(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.services.navigation_links.get_active(id).await?;
    Ok(success_response(NavigationLinkResponse::from(link)))
}

#[utoipa::path(
    get,
    path = "/api/admin/navigation-links/",
    params(PaginationParams, AdminLinkListParams),
    responses(
        (status = 200, description = "Paginated links", body = PaginatedResponse<AdminNavigationLinkResponse>),
        (status = 400, description = "Malformed filter", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_list_links(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<AdminLinkListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = NavigationLinkQuery {
        search: search_param(params.q),
        location: parse_choice_param("ubicacion", params.ubicacion.as_deref())?,
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
    };
    let page = state
        .services
        .navigation_links
        .list(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminNavigationLinkResponse::from,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/navigation-links/",
    request_body = NavigationLinkDraft,
    responses(
        (status = 201, description = "Link created", body = AdminNavigationLinkResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_link(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NavigationLinkDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.services.navigation_links.create(payload).await?;
    Ok(created_response(AdminNavigationLinkResponse::from(link)))
}

#[utoipa::path(
    get,
    path = "/api/admin/navigation-links/{id}/",
    params(("id" = i32, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Link", body = AdminNavigationLinkResponse),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_get_link(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.services.navigation_links.get(id).await?;
    Ok(success_response(AdminNavigationLinkResponse::from(link)))
}

#[utoipa::path(
    put,
    path = "/api/admin/navigation-links/{id}/",
    params(("id" = i32, Path, description = "Link ID")),
    request_body = NavigationLinkDraft,
    responses(
        (status = 200, description = "Link updated", body = AdminNavigationLinkResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_link(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<NavigationLinkDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.services.navigation_links.update(id, payload).await?;
    Ok(success_response(AdminNavigationLinkResponse::from(link)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/navigation-links/{id}/",
    params(("id" = i32, Path, description = "Link ID")),
    request_body = NavigationLinkPatch,
    responses(
        (status = 200, description = "Link updated", body = AdminNavigationLinkResponse),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_link(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<NavigationLinkPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.services.navigation_links.patch(id, payload).await?;
    Ok(success_response(AdminNavigationLinkResponse::from(link)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/navigation-links/{id}/",
    params(("id" = i32, Path, description = "Link ID")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_link(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.navigation_links.delete(id).await?;
    Ok(no_content_response())
}
