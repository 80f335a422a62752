use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, search_param, success_response,
    ApiPath, ApiQuery, JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::catalog::CategoryModel,
    errors::ApiError,
    services::catalog::categories::{CategoryDraft, CategoryFilter, CategoryPatch, CategoryWithCount},
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
        .route_slash("/api/categorias", get(list_categories).post(create_category))
        .route_slash(
            "/api/categorias/:id",
            get(get_category)
                .put(update_category)
                .patch(patch_category)
                .delete(delete_category),
        )
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/categorias",
            get(admin_list_categories).post(create_category),
        )
        .route_slash(
            "/api/admin/categorias/:id",
            get(admin_get_category)
                .put(update_category)
                .patch(patch_category)
                .delete(delete_category),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub slug: String,
    pub activo: bool,
    pub orden: i32,
    pub imagen_categoria: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryModel> for CategoryResponse {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            nombre: model.name,
            descripcion: model.description,
            slug: model.slug,
            activo: model.is_active,
            orden: model.sort_order,
            imagen_categoria: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Admin view of a category with the number of articles filed under it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCategoryResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub articulos_count: u64,
}

impl From<CategoryWithCount> for AdminCategoryResponse {
    fn from(row: CategoryWithCount) -> Self {
        Self {
            category: row.category.into(),
            articulos_count: row.article_count,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryListParams {
    /// Case-insensitive search over name and description
    pub q: Option<String>,
    pub activo: Option<String>,
}

/// List categories ordered by `orden`, then name
#[utoipa::path(
    get,
    path = "/api/categorias/",
    responses(
        (status = 200, description = "Categories", body = Vec<CategoryResponse>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.services.categories.list().await?;
    let body: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

/// Create a category; a blank slug is derived from the name
#[utoipa::path(
    post,
    path = "/api/categorias/",
    request_body = CategoryDraft,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.services.categories.create(payload).await?;
    Ok(created_response(CategoryResponse::from(category)))
}

#[utoipa::path(
    get,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.services.categories.get(id).await?;
    Ok(success_response(CategoryResponse::from(category)))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryDraft,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.services.categories.update(id, payload).await?;
    Ok(success_response(CategoryResponse::from(category)))
}

#[utoipa::path(
    patch,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn patch_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<CategoryPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.services.categories.patch(id, payload).await?;
    Ok(success_response(CategoryResponse::from(category)))
}

/// Delete a category; its articles are kept with no category
#[utoipa::path(
    delete,
    path = "/api/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.categories.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/categorias/",
    params(PaginationParams, CategoryListParams),
    responses(
        (status = 200, description = "Paginated categories", body = PaginatedResponse<AdminCategoryResponse>),
        (status = 401, description = "Missing or invalid admin token", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_list_categories(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<CategoryListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = CategoryFilter {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
    };
    let page = state
        .services
        .categories
        .list_admin(filter, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminCategoryResponse::from,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/categorias/{id}/",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category with article count", body = AdminCategoryResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state.services.categories.get_with_count(id).await?;
    Ok(success_response(AdminCategoryResponse::from(row)))
}
