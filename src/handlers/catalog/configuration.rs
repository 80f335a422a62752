use crate::handlers::common::{
    created_response, no_content_response, search_param, success_response, ApiPath, ApiQuery,
    JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::catalog::ConfigurationModel,
    errors::ApiError,
    services::catalog::configuration::{ConfigurationDraft, ConfigurationPatch},
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/configuracion",
            get(list_settings).post(create_setting),
        )
        .route_slash(
            "/api/admin/configuracion/:id",
            get(get_setting)
                .put(update_setting)
                .patch(patch_setting)
                .delete(delete_setting),
        )
        .route_slash(
            "/api/admin/configuracion/clave/:clave",
            get(get_setting_by_key),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigurationResponse {
    pub id: i32,
    pub clave: String,
    pub valor: String,
    pub descripcion: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConfigurationModel> for ConfigurationResponse {
    fn from(model: ConfigurationModel) -> Self {
        Self {
            id: model.id,
            clave: model.key,
            valor: model.value,
            descripcion: model.description,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfigurationListParams {
    /// Search over key, description and value
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/admin/configuracion/",
    params(PaginationParams, ConfigurationListParams),
    responses(
        (status = 200, description = "Paginated settings ordered by key", body = PaginatedResponse<ConfigurationResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_settings(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<ConfigurationListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .services
        .configuration
        .list(search_param(params.q), pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        ConfigurationResponse::from,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/configuracion/",
    request_body = ConfigurationDraft,
    responses(
        (status = 201, description = "Setting created", body = ConfigurationResponse),
        (status = 400, description = "Invalid payload or duplicate key", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_setting(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ConfigurationDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state.services.configuration.create(payload).await?;
    Ok(created_response(ConfigurationResponse::from(setting)))
}

#[utoipa::path(
    get,
    path = "/api/admin/configuracion/{id}/",
    params(("id" = i32, Path, description = "Setting ID")),
    responses(
        (status = 200, description = "Setting", body = ConfigurationResponse),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state.services.configuration.get(id).await?;
    Ok(success_response(ConfigurationResponse::from(setting)))
}

#[utoipa::path(
    get,
    path = "/api/admin/configuracion/clave/{clave}/",
    params(("clave" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting", body = ConfigurationResponse),
        (status = 404, description = "No setting with this key", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_setting_by_key(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state.services.configuration.get_by_key(&key).await?;
    Ok(success_response(ConfigurationResponse::from(setting)))
}

#[utoipa::path(
    put,
    path = "/api/admin/configuracion/{id}/",
    params(("id" = i32, Path, description = "Setting ID")),
    request_body = ConfigurationDraft,
    responses(
        (status = 200, description = "Setting updated", body = ConfigurationResponse),
        (status = 400, description = "Invalid payload or duplicate key", body = crate::errors::ErrorResponse),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ConfigurationDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state.services.configuration.update(id, payload).await?;
    Ok(success_response(ConfigurationResponse::from(setting)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/configuracion/{id}/",
    params(("id" = i32, Path, description = "Setting ID")),
    request_body = ConfigurationPatch,
    responses(
        (status = 200, description = "Setting updated", body = ConfigurationResponse),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_setting(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ConfigurationPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let setting = state.services.configuration.patch(id, payload).await?;
    Ok(success_response(ConfigurationResponse::from(setting)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/configuracion/{id}/",
    params(("id" = i32, Path, description = "Setting ID")),
    responses(
        (status = 204, description = "Setting deleted"),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_setting(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.configuration.delete(id).await?;
    Ok(no_content_response())
}
