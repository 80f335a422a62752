use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, parse_id_param, search_param,
    success_response, ApiPath, ApiQuery, JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::catalog::{FilterModel, FilterValueModel},
    errors::ApiError,
    services::catalog::filters::{
        FilterDraft, FilterPatch, FilterQuery, FilterValueDetail, FilterValueDraft,
        FilterValuePatch, FilterValueQuery, FilterWithCount,
    },
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
        .route_slash("/api/admin/filtros", get(list_filters).post(create_filter))
        .route_slash(
            "/api/admin/filtros/:id",
            get(get_filter)
                .put(update_filter)
                .patch(patch_filter)
                .delete(delete_filter),
        )
        .route_slash(
            "/api/admin/filtros/:id/valores",
            get(list_values_of_filter).post(create_value),
        )
        .route_slash("/api/admin/filtro-valores", get(list_values))
        .route_slash(
            "/api/admin/filtro-valores/:id",
            get(get_value).patch(patch_value).delete(delete_value),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilterResponse {
    pub id: i32,
    pub nombre: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FilterModel> for FilterResponse {
    fn from(model: FilterModel) -> Self {
        Self {
            id: model.id,
            nombre: model.name,
            activo: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminFilterResponse {
    #[serde(flatten)]
    pub filter: FilterResponse,
    pub valores_count: u64,
}

impl From<FilterWithCount> for AdminFilterResponse {
    fn from(row: FilterWithCount) -> Self {
        Self {
            filter: row.filter.into(),
            valores_count: row.value_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilterValueResponse {
    pub id: i32,
    pub filtro: i32,
    pub valor: String,
    pub color_hex: Option<String>,
    pub activo: bool,
}

impl From<FilterValueModel> for FilterValueResponse {
    fn from(model: FilterValueModel) -> Self {
        Self {
            id: model.id,
            filtro: model.filter_id,
            valor: model.value,
            color_hex: model.color_hex,
            activo: model.is_active,
        }
    }
}

/// Filter value with its filter's name and how many articles use it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilterValueDetailResponse {
    #[serde(flatten)]
    pub value: FilterValueResponse,
    pub filtro_nombre: String,
    pub articulos_count: u64,
}

impl From<FilterValueDetail> for FilterValueDetailResponse {
    fn from(detail: FilterValueDetail) -> Self {
        Self {
            value: detail.value.into(),
            filtro_nombre: detail.filter.name,
            articulos_count: detail.article_count,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterListParams {
    pub q: Option<String>,
    pub activo: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterValueListParams {
    /// Search over value and filter name
    pub q: Option<String>,
    pub activo: Option<String>,
    /// Filter id
    pub filtro: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/admin/filtros/",
    params(PaginationParams, FilterListParams),
    responses(
        (status = 200, description = "Paginated filters", body = PaginatedResponse<AdminFilterResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_filters(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<FilterListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = FilterQuery {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
    };
    let page = state
        .services
        .filters
        .list(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminFilterResponse::from,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/filtros/",
    request_body = FilterDraft,
    responses(
        (status = 201, description = "Filter created", body = FilterResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_filter(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<FilterDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = state.services.filters.create(payload).await?;
    Ok(created_response(FilterResponse::from(filter)))
}

#[utoipa::path(
    get,
    path = "/api/admin/filtros/{id}/",
    params(("id" = i32, Path, description = "Filter ID")),
    responses(
        (status = 200, description = "Filter with value count", body = AdminFilterResponse),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_filter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = state.services.filters.get(id).await?;
    Ok(success_response(AdminFilterResponse::from(filter)))
}

#[utoipa::path(
    put,
    path = "/api/admin/filtros/{id}/",
    params(("id" = i32, Path, description = "Filter ID")),
    request_body = FilterDraft,
    responses(
        (status = 200, description = "Filter updated", body = FilterResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_filter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<FilterDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = state.services.filters.update(id, payload).await?;
    Ok(success_response(FilterResponse::from(filter)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/filtros/{id}/",
    params(("id" = i32, Path, description = "Filter ID")),
    request_body = FilterPatch,
    responses(
        (status = 200, description = "Filter updated", body = FilterResponse),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_filter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<FilterPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = state.services.filters.patch(id, payload).await?;
    Ok(success_response(FilterResponse::from(filter)))
}

/// Delete a filter with its values and their article links
#[utoipa::path(
    delete,
    path = "/api/admin/filtros/{id}/",
    params(("id" = i32, Path, description = "Filter ID")),
    responses(
        (status = 204, description = "Filter deleted"),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_filter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.filters.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/filtros/{id}/valores/",
    params(("id" = i32, Path, description = "Filter ID")),
    responses(
        (status = 200, description = "Values of the filter", body = Vec<FilterValueResponse>),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_values_of_filter(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let values = state.services.filters.values_of(id).await?;
    let body: Vec<FilterValueResponse> = values.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

/// Create a value under the filter in the path
#[utoipa::path(
    post,
    path = "/api/admin/filtros/{id}/valores/",
    params(("id" = i32, Path, description = "Filter ID")),
    request_body = FilterValueDraft,
    responses(
        (status = 201, description = "Value created", body = FilterValueResponse),
        (status = 400, description = "Invalid payload or duplicate value", body = crate::errors::ErrorResponse),
        (status = 404, description = "Filter not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_value(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(mut payload): JsonBody<FilterValueDraft>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown parent is a missing resource here, not a field error.
    state.services.filters.get(id).await?;
    payload.filter_id = id;
    let value = state.services.filters.create_value(payload).await?;
    Ok(created_response(FilterValueResponse::from(value)))
}

#[utoipa::path(
    get,
    path = "/api/admin/filtro-valores/",
    params(PaginationParams, FilterValueListParams),
    responses(
        (status = 200, description = "Paginated filter values", body = PaginatedResponse<FilterValueDetailResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_values(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<FilterValueListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = FilterValueQuery {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
        filter_id: parse_id_param("filtro", params.filtro.as_deref())?,
    };
    let page = state
        .services
        .filters
        .list_values(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        FilterValueDetailResponse::from,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/filtro-valores/{id}/",
    params(("id" = i32, Path, description = "Filter value ID")),
    responses(
        (status = 200, description = "Filter value", body = FilterValueDetailResponse),
        (status = 404, description = "Filter value not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_value(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.services.filters.get_value(id).await?;
    Ok(success_response(FilterValueDetailResponse::from(detail)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/filtro-valores/{id}/",
    params(("id" = i32, Path, description = "Filter value ID")),
    request_body = FilterValuePatch,
    responses(
        (status = 200, description = "Filter value updated", body = FilterValueResponse),
        (status = 400, description = "Invalid payload or duplicate value", body = crate::errors::ErrorResponse),
        (status = 404, description = "Filter value not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_value(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<FilterValuePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let value = state.services.filters.patch_value(id, payload).await?;
    Ok(success_response(FilterValueResponse::from(value)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/filtro-valores/{id}/",
    params(("id" = i32, Path, description = "Filter value ID")),
    responses(
        (status = 204, description = "Filter value deleted"),
        (status = 404, description = "Filter value not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_value(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.filters.delete_value(id).await?;
    Ok(no_content_response())
}
