use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, parse_choice_param, parse_id_param,
    search_param, success_response, ApiPath, ApiQuery, JsonBody, PaginatedResponse,
    PaginationParams, RouterExt,
};
use crate::{
    errors::ApiError,
    services::catalog::{
        articles::{
            AdminArticleFilter, ArticleDraft, ArticlePatch, ArticleQuery, ArticleWithCategory,
            AttachImage, AttachedFilterValue, AttachmentPatch, GalleryImage,
        },
        buckets::{PriceRange, StockLevel},
    },
    AppState,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get, patch},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route_slash("/api/articulos", get(list_articles).post(create_article))
        .route_slash(
            "/api/articulos/:id",
            get(get_article)
                .put(update_article)
                .patch(patch_article)
                .delete(delete_article),
        )
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/articulos",
            get(admin_list_articles).post(create_article),
        )
        .route_slash(
            "/api/admin/articulos/:id",
            get(admin_get_article)
                .put(update_article)
                .patch(patch_article)
                .delete(delete_article),
        )
        .route_slash(
            "/api/admin/articulos/:id/imagenes",
            get(list_gallery).post(attach_image),
        )
        .route_slash(
            "/api/admin/articulo-imagenes/:id",
            patch(update_gallery_entry).delete(detach_image),
        )
        .route_slash(
            "/api/admin/articulos/:id/filtros",
            get(list_article_filters).post(attach_filter_value),
        )
        .route_slash(
            "/api/admin/articulos/:id/filtros/:filter_value_id",
            delete(detach_filter_value),
        )
}

/// Money amounts always carry two decimal places on the wire.
fn money(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    pub id: i32,
    pub categoria: Option<i32>,
    pub categoria_nombre: Option<String>,
    pub nombre: String,
    pub descripcion: Option<String>,
    #[schema(value_type = String, example = "19.99")]
    pub precio: Decimal,
    pub stock: i32,
    pub sku: Option<String>,
    pub activo: bool,
    pub destacado: bool,
    pub imagen_principal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleWithCategory> for ArticleResponse {
    fn from(row: ArticleWithCategory) -> Self {
        let article = row.article;
        Self {
            id: article.id,
            categoria: article.category_id,
            categoria_nombre: row.category_name,
            nombre: article.name,
            descripcion: article.description,
            precio: money(article.price),
            stock: article.stock,
            sku: article.sku,
            activo: article.is_active,
            destacado: article.is_featured,
            imagen_principal: article.primary_image,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Admin view with the stock and price buckets the listing filters on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminArticleResponse {
    #[serde(flatten)]
    pub article: ArticleResponse,
    pub stock_nivel: StockLevel,
    pub rango_precio: PriceRange,
}

impl From<ArticleWithCategory> for AdminArticleResponse {
    fn from(row: ArticleWithCategory) -> Self {
        let article = ArticleResponse::from(row);
        Self {
            stock_nivel: StockLevel::classify(article.stock),
            rango_precio: PriceRange::classify(article.precio),
            article,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GalleryImageResponse {
    pub id: i32,
    pub articulo: i32,
    pub imagen: i32,
    pub es_principal: bool,
    pub orden: i32,
    pub imagen_url: String,
    pub nombre_archivo: String,
    pub alt_text: Option<String>,
}

impl From<GalleryImage> for GalleryImageResponse {
    fn from(entry: GalleryImage) -> Self {
        Self {
            id: entry.link.id,
            articulo: entry.link.article_id,
            imagen: entry.link.image_id,
            es_principal: entry.link.is_primary,
            orden: entry.link.sort_order,
            imagen_url: entry.image.file,
            nombre_archivo: entry.image.file_name,
            alt_text: entry.image.alt_text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ArticleFilterValueResponse {
    /// Filter value id
    pub id: i32,
    pub filtro: i32,
    pub filtro_nombre: String,
    pub valor: String,
    pub color_hex: Option<String>,
}

impl From<AttachedFilterValue> for ArticleFilterValueResponse {
    fn from(attached: AttachedFilterValue) -> Self {
        Self {
            id: attached.value.id,
            filtro: attached.filter.id,
            filtro_nombre: attached.filter.name,
            valor: attached.value.value,
            color_hex: attached.value.color_hex,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttachFilterValueRequest {
    pub filtro_valor: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleListParams {
    /// Category id
    pub categoria: Option<String>,
    pub activo: Option<String>,
    pub destacado: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminArticleListParams {
    /// `empty`, `low`, `medium` or `high`
    pub stock: Option<String>,
    /// `low`, `medium` or `high`
    pub precio: Option<String>,
    pub activo: Option<String>,
    pub destacado: Option<String>,
    pub categoria: Option<String>,
    /// Case-insensitive search over name, description, SKU and category name
    pub q: Option<String>,
}

/// List articles, newest first
#[utoipa::path(
    get,
    path = "/api/articulos/",
    params(ArticleListParams),
    responses(
        (status = 200, description = "Articles", body = Vec<ArticleResponse>),
        (status = 400, description = "Malformed filter", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn list_articles(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ArticleListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ArticleQuery {
        category_id: parse_id_param("categoria", params.categoria.as_deref())?,
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
        is_featured: parse_bool_param("destacado", params.destacado.as_deref())?,
    };
    let articles = state.services.articles.list(query).await?;
    let body: Vec<ArticleResponse> = articles.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    post,
    path = "/api/articulos/",
    request_body = ArticleDraft,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn create_article(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ArticleDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.services.articles.create(payload).await?;
    Ok(created_response(ArticleResponse::from(article)))
}

#[utoipa::path(
    get,
    path = "/api/articulos/{id}/",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn get_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.services.articles.get(id).await?;
    Ok(success_response(ArticleResponse::from(article)))
}

#[utoipa::path(
    put,
    path = "/api/articulos/{id}/",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = ArticleDraft,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn update_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ArticleDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.services.articles.update(id, payload).await?;
    Ok(success_response(ArticleResponse::from(article)))
}

#[utoipa::path(
    patch,
    path = "/api/articulos/{id}/",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = ArticlePatch,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn patch_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ArticlePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.services.articles.patch(id, payload).await?;
    Ok(success_response(ArticleResponse::from(article)))
}

/// Delete an article with its gallery and filter links
#[utoipa::path(
    delete,
    path = "/api/articulos/{id}/",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Articles"
)]
pub async fn delete_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.articles.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/articulos/",
    params(PaginationParams, AdminArticleListParams),
    responses(
        (status = 200, description = "Paginated articles", body = PaginatedResponse<AdminArticleResponse>),
        (status = 400, description = "Malformed filter", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing or invalid admin token", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_list_articles(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<AdminArticleListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = AdminArticleFilter {
        stock: parse_choice_param("stock", params.stock.as_deref())?,
        price: parse_choice_param("precio", params.precio.as_deref())?,
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
        is_featured: parse_bool_param("destacado", params.destacado.as_deref())?,
        category_id: parse_id_param("categoria", params.categoria.as_deref())?,
        search: search_param(params.q),
    };
    let page = state
        .services
        .articles
        .list_admin(filter, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminArticleResponse::from,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/articulos/{id}/",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article with buckets", body = AdminArticleResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_get_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.services.articles.get(id).await?;
    Ok(success_response(AdminArticleResponse::from(article)))
}

/// Gallery of an article ordered by `orden`
#[utoipa::path(
    get,
    path = "/api/admin/articulos/{id}/imagenes/",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Gallery entries", body = Vec<GalleryImageResponse>),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_gallery(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.services.articles.list_images(id).await?;
    let body: Vec<GalleryImageResponse> = entries.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    post,
    path = "/api/admin/articulos/{id}/imagenes/",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = AttachImage,
    responses(
        (status = 201, description = "Image attached", body = GalleryImageResponse),
        (status = 400, description = "Unknown image or duplicate attachment", body = crate::errors::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn attach_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<AttachImage>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.services.articles.attach_image(id, payload).await?;
    Ok(created_response(GalleryImageResponse::from(entry)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/articulo-imagenes/{id}/",
    params(("id" = i32, Path, description = "Gallery entry ID")),
    request_body = AttachmentPatch,
    responses(
        (status = 200, description = "Gallery entry updated", body = GalleryImageResponse),
        (status = 404, description = "Gallery entry not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_gallery_entry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<AttachmentPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.services.articles.update_attachment(id, payload).await?;
    Ok(success_response(GalleryImageResponse::from(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/articulo-imagenes/{id}/",
    params(("id" = i32, Path, description = "Gallery entry ID")),
    responses(
        (status = 204, description = "Gallery entry removed"),
        (status = 404, description = "Gallery entry not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn detach_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.articles.detach_image(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/articulos/{id}/filtros/",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Filter values of the article", body = Vec<ArticleFilterValueResponse>),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_article_filters(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let values = state.services.articles.list_filter_values(id).await?;
    let body: Vec<ArticleFilterValueResponse> = values.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    post,
    path = "/api/admin/articulos/{id}/filtros/",
    params(("id" = i32, Path, description = "Article ID")),
    request_body = AttachFilterValueRequest,
    responses(
        (status = 201, description = "Filter value attached", body = ArticleFilterValueResponse),
        (status = 400, description = "Unknown value or duplicate link", body = crate::errors::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn attach_filter_value(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<AttachFilterValueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attached = state
        .services
        .articles
        .attach_filter_value(id, payload.filtro_valor)
        .await?;
    Ok(created_response(ArticleFilterValueResponse::from(attached)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/articulos/{id}/filtros/{filter_value_id}/",
    params(
        ("id" = i32, Path, description = "Article ID"),
        ("filter_value_id" = i32, Path, description = "Filter value ID")
    ),
    responses(
        (status = 204, description = "Filter value detached"),
        (status = 404, description = "Link not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn detach_filter_value(
    State(state): State<AppState>,
    ApiPath((id, filter_value_id)): ApiPath<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .articles
        .detach_filter_value(id, filter_value_id)
        .await?;
    Ok(no_content_response())
}
