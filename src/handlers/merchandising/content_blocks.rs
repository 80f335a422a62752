use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, search_param, success_response,
    ApiPath, ApiQuery, JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::merchandising::ContentBlockModel,
    errors::ApiError,
    services::merchandising::content_blocks::{
        ContentBlockDraft, ContentBlockPatch, ContentBlockQuery,
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

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route_slash("/api/content-blocks", get(list_blocks))
        .route_slash("/api/content-blocks/:id", get(get_block))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/content-blocks",
            get(admin_list_blocks).post(create_block),
        )
        .route_slash(
            "/api/admin/content-blocks/:id",
            get(admin_get_block)
                .put(update_block)
                .patch(patch_block)
                .delete(delete_block),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContentBlockResponse {
    pub id: i32,
    pub identificador: String,
    pub titulo: Option<String>,
    pub contenido_html: Option<String>,
    pub imagen_asociada: Option<String>,
    pub enlace_url: Option<String>,
    pub activo: bool,
}

impl From<ContentBlockModel> for ContentBlockResponse {
    fn from(model: ContentBlockModel) -> Self {
        Self {
            id: model.id,
            identificador: model.identifier,
            titulo: model.title,
            contenido_html: model.html_content,
            imagen_asociada: model.image,
            enlace_url: model.link_url,
            activo: model.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminContentBlockResponse {
    #[serde(flatten)]
    pub block: ContentBlockResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentBlockModel> for AdminContentBlockResponse {
    fn from(model: ContentBlockModel) -> Self {
        Self {
            created_at: model.created_at,
            updated_at: model.updated_at,
            block: model.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlockFilterParams {
    /// Exact block identifier
    pub identificador: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminBlockListParams {
    pub q: Option<String>,
    pub activo: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/content-blocks/",
    params(BlockFilterParams),
    responses(
        (status = 200, description = "Active content blocks", body = Vec<ContentBlockResponse>)
    ),
    tag = "Merchandising"
)]
pub async fn list_blocks(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BlockFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let blocks = state
        .services
        .content_blocks
        .list_active(params.identificador)
        .await?;
    let body: Vec<ContentBlockResponse> = blocks.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    get,
    path = "/api/content-blocks/{id}/",
    params(("id" = i32, Path, description = "Content block ID")),
    responses(
        (status = 200, description = "Active content block", body = ContentBlockResponse),
        (status = 404, description = "Unknown or inactive block", body = crate::errors::ErrorResponse)
    ),
    tag = "Merchandising"
)]
pub async fn get_block(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let block = state.services.content_blocks.get_active(id).await?;
    Ok(success_response(ContentBlockResponse::from(block)))
}

#[utoipa::path(
    get,
    path = "/api/admin/content-blocks/",
    params(PaginationParams, AdminBlockListParams),
    responses(
        (status = 200, description = "Paginated content blocks", body = PaginatedResponse<AdminContentBlockResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_list_blocks(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<AdminBlockListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ContentBlockQuery {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
    };
    let page = state
        .services
        .content_blocks
        .list(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminContentBlockResponse::from,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/content-blocks/",
    request_body = ContentBlockDraft,
    responses(
        (status = 201, description = "Content block created", body = AdminContentBlockResponse),
        (status = 400, description = "Invalid payload or duplicate identifier", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_block(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ContentBlockDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let block = state.services.content_blocks.create(payload).await?;
    Ok(created_response(AdminContentBlockResponse::from(block)))
}

#[utoipa::path(
    get,
    path = "/api/admin/content-blocks/{id}/",
    params(("id" = i32, Path, description = "Content block ID")),
    responses(
        (status = 200, description = "Content block", body = AdminContentBlockResponse),
        (status = 404, description = "Content block not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_get_block(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let block = state.services.content_blocks.get(id).await?;
    Ok(success_response(AdminContentBlockResponse::from(block)))
}

#[utoipa::path(
    put,
    path = "/api/admin/content-blocks/{id}/",
    params(("id" = i32, Path, description = "Content block ID")),
    request_body = ContentBlockDraft,
    responses(
        (status = 200, description = "Content block updated", body = AdminContentBlockResponse),
        (status = 400, description = "Invalid payload or duplicate identifier", body = crate::errors::ErrorResponse),
        (status = 404, description = "Content block not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_block(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ContentBlockDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let block = state.services.content_blocks.update(id, payload).await?;
    Ok(success_response(AdminContentBlockResponse::from(block)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/content-blocks/{id}/",
    params(("id" = i32, Path, description = "Content block ID")),
    request_body = ContentBlockPatch,
    responses(
        (status = 200, description = "Content block updated", body = AdminContentBlockResponse),
        (status = 404, description = "Content block not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_block(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ContentBlockPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let block = state.services.content_blocks.patch(id, payload).await?;
    Ok(success_response(AdminContentBlockResponse::from(block)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/content-blocks/{id}/",
    params(("id" = i32, Path, description = "Content block ID")),
    responses(
        (status = 204, description = "Content block deleted"),
        (status = 404, description = "Content block not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_block(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.content_blocks.delete(id).await?;
    Ok(no_content_response())
}
