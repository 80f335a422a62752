use crate::handlers::common::{
    created_response, no_content_response, parse_bool_param, parse_id_param, search_param,
    success_response, ApiPath, ApiQuery, JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::merchandising::{CarouselModel, CarouselSlideModel},
    errors::ApiError,
    services::merchandising::carousels::{
        CarouselDraft, CarouselPatch, CarouselQuery, CarouselWithCount, CarouselWithSlides,
        SlideDraft, SlidePatch, SlideQuery, SlideWithCarousel,
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
        .route_slash("/api/carousels", get(list_carousels))
        .route_slash("/api/carousels/:id", get(get_carousel))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash(
            "/api/admin/carousels",
            get(admin_list_carousels).post(create_carousel),
        )
        .route_slash(
            "/api/admin/carousels/:id",
            get(admin_get_carousel)
                .put(update_carousel)
                .patch(patch_carousel)
                .delete(delete_carousel),
        )
        .route_slash(
            "/api/admin/carousels/:id/slides",
            get(list_slides_of_carousel).post(create_slide),
        )
        .route_slash("/api/admin/carousel-slides", get(list_slides))
        .route_slash(
            "/api/admin/carousel-slides/:id",
            get(get_slide).patch(patch_slide).delete(delete_slide),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SlideResponse {
    pub id: i32,
    pub imagen: String,
    pub titulo: Option<String>,
    pub subtitulo: Option<String>,
    pub enlace_url: Option<String>,
    pub orden: i32,
    pub activo: bool,
}

impl From<CarouselSlideModel> for SlideResponse {
    fn from(model: CarouselSlideModel) -> Self {
        Self {
            id: model.id,
            imagen: model.image,
            titulo: model.title,
            subtitulo: model.subtitle,
            enlace_url: model.link_url,
            orden: model.sort_order,
            activo: model.is_active,
        }
    }
}

/// Carousel with its nested slides.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CarouselResponse {
    pub id: i32,
    pub nombre: String,
    pub activo: bool,
    pub slides: Vec<SlideResponse>,
}

impl From<CarouselWithSlides> for CarouselResponse {
    fn from(row: CarouselWithSlides) -> Self {
        Self {
            id: row.carousel.id,
            nombre: row.carousel.name,
            activo: row.carousel.is_active,
            slides: row.slides.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCarouselResponse {
    pub id: i32,
    pub nombre: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarouselModel> for AdminCarouselResponse {
    fn from(model: CarouselModel) -> Self {
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
pub struct AdminCarouselListItem {
    #[serde(flatten)]
    pub carousel: AdminCarouselResponse,
    pub slides_count: u64,
}

impl From<CarouselWithCount> for AdminCarouselListItem {
    fn from(row: CarouselWithCount) -> Self {
        Self {
            carousel: row.carousel.into(),
            slides_count: row.slide_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminCarouselDetail {
    #[serde(flatten)]
    pub carousel: AdminCarouselResponse,
    pub slides: Vec<AdminSlideResponse>,
}

impl From<CarouselWithSlides> for AdminCarouselDetail {
    fn from(row: CarouselWithSlides) -> Self {
        Self {
            carousel: row.carousel.into(),
            slides: row.slides.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSlideResponse {
    #[serde(flatten)]
    pub slide: SlideResponse,
    pub carousel: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CarouselSlideModel> for AdminSlideResponse {
    fn from(model: CarouselSlideModel) -> Self {
        Self {
            carousel: model.carousel_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            slide: model.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminSlideListItem {
    #[serde(flatten)]
    pub slide: AdminSlideResponse,
    pub carousel_nombre: Option<String>,
}

impl From<SlideWithCarousel> for AdminSlideListItem {
    fn from(row: SlideWithCarousel) -> Self {
        Self {
            slide: row.slide.into(),
            carousel_nombre: row.carousel_name,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarouselFilterParams {
    /// Exact carousel name
    pub nombre: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminCarouselListParams {
    pub q: Option<String>,
    pub activo: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlideListParams {
    /// Search over title, subtitle and carousel name
    pub q: Option<String>,
    pub activo: Option<String>,
    /// Carousel id
    pub carousel: Option<String>,
}

/// Active carousels with their active slides
#[utoipa::path(
    get,
    path = "/api/carousels/",
    params(CarouselFilterParams),
    responses(
        (status = 200, description = "Active carousels", body = Vec<CarouselResponse>)
    ),
    tag = "Merchandising"
)]
pub async fn list_carousels(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CarouselFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let carousels = state.services.carousels.list_active(params.nombre).await?;
    let body: Vec<CarouselResponse> = carousels.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    get,
    path = "/api/carousels/{id}/",
    params(("id" = i32, Path, description = "Carousel ID")),
    responses(
        (status = 200, description = "Active carousel", body = CarouselResponse),
        (status = 404, description = "Unknown or inactive carousel", body = crate::errors::ErrorResponse)
    ),
    tag = "Merchandising"
)]
pub async fn get_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let carousel = state.services.carousels.get_active(id).await?;
    Ok(success_response(CarouselResponse::from(carousel)))
}

#[utoipa::path(
    get,
    path = "/api/admin/carousels/",
    params(PaginationParams, AdminCarouselListParams),
    responses(
        (status = 200, description = "Paginated carousels", body = PaginatedResponse<AdminCarouselListItem>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_list_carousels(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<AdminCarouselListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = CarouselQuery {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
    };
    let page = state
        .services
        .carousels
        .list(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminCarouselListItem::from,
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/carousels/",
    request_body = CarouselDraft,
    responses(
        (status = 201, description = "Carousel created", body = AdminCarouselResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_carousel(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CarouselDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let carousel = state.services.carousels.create(payload).await?;
    Ok(created_response(AdminCarouselResponse::from(carousel)))
}

#[utoipa::path(
    get,
    path = "/api/admin/carousels/{id}/",
    params(("id" = i32, Path, description = "Carousel ID")),
    responses(
        (status = 200, description = "Carousel with every slide", body = AdminCarouselDetail),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn admin_get_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let carousel = state.services.carousels.get(id).await?;
    Ok(success_response(AdminCarouselDetail::from(carousel)))
}

#[utoipa::path(
    put,
    path = "/api/admin/carousels/{id}/",
    params(("id" = i32, Path, description = "Carousel ID")),
    request_body = CarouselDraft,
    responses(
        (status = 200, description = "Carousel updated", body = AdminCarouselResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = crate::errors::ErrorResponse),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn update_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<CarouselDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let carousel = state.services.carousels.update(id, payload).await?;
    Ok(success_response(AdminCarouselResponse::from(carousel)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/carousels/{id}/",
    params(("id" = i32, Path, description = "Carousel ID")),
    request_body = CarouselPatch,
    responses(
        (status = 200, description = "Carousel updated", body = AdminCarouselResponse),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<CarouselPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let carousel = state.services.carousels.patch(id, payload).await?;
    Ok(success_response(AdminCarouselResponse::from(carousel)))
}

/// Delete a carousel together with its slides
#[utoipa::path(
    delete,
    path = "/api/admin/carousels/{id}/",
    params(("id" = i32, Path, description = "Carousel ID")),
    responses(
        (status = 204, description = "Carousel deleted"),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.carousels.delete(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/carousels/{id}/slides/",
    params(("id" = i32, Path, description = "Carousel ID")),
    responses(
        (status = 200, description = "Every slide of the carousel, in display order", body = Vec<AdminSlideResponse>),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_slides_of_carousel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let slides = state.services.carousels.slides_of(id).await?;
    let body: Vec<AdminSlideResponse> = slides.into_iter().map(Into::into).collect();
    Ok(success_response(body))
}

#[utoipa::path(
    post,
    path = "/api/admin/carousels/{id}/slides/",
    params(("id" = i32, Path, description = "Carousel ID")),
    request_body = SlideDraft,
    responses(
        (status = 201, description = "Slide created", body = AdminSlideResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Carousel not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn create_slide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(mut payload): JsonBody<SlideDraft>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.carousels.get(id).await?;
    payload.carousel_id = id;
    let slide = state.services.carousels.create_slide(payload).await?;
    Ok(created_response(AdminSlideResponse::from(slide)))
}

#[utoipa::path(
    get,
    path = "/api/admin/carousel-slides/",
    params(PaginationParams, SlideListParams),
    responses(
        (status = 200, description = "Paginated slides", body = PaginatedResponse<AdminSlideListItem>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_slides(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<SlideListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = SlideQuery {
        search: search_param(params.q),
        is_active: parse_bool_param("activo", params.activo.as_deref())?,
        carousel_id: parse_id_param("carousel", params.carousel.as_deref())?,
    };
    let page = state
        .services
        .carousels
        .list_slides(query, pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        AdminSlideListItem::from,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/carousel-slides/{id}/",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Slide", body = AdminSlideResponse),
        (status = 404, description = "Slide not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_slide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let slide = state.services.carousels.get_slide(id).await?;
    Ok(success_response(AdminSlideResponse::from(slide)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/carousel-slides/{id}/",
    params(("id" = i32, Path, description = "Slide ID")),
    request_body = SlidePatch,
    responses(
        (status = 200, description = "Slide updated", body = AdminSlideResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Slide not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_slide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<SlidePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let slide = state.services.carousels.patch_slide(id, payload).await?;
    Ok(success_response(AdminSlideResponse::from(slide)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/carousel-slides/{id}/",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 204, description = "Slide deleted"),
        (status = 404, description = "Slide not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_slide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.carousels.delete_slide(id).await?;
    Ok(no_content_response())
}
