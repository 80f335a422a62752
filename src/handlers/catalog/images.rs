use crate::handlers::common::{
    created_response, no_content_response, search_param, success_response, ApiPath, ApiQuery,
    JsonBody, PaginatedResponse, PaginationParams, RouterExt,
};
use crate::{
    entities::catalog::ImageModel,
    errors::{ApiError, NON_FIELD_ERRORS},
    services::catalog::images::{ImagePatch, ImageUpload},
    AppState,
};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route_slash("/api/admin/imagenes", get(list_images).post(upload_image))
        .route_slash(
            "/api/admin/imagenes/:id",
            get(get_image).patch(patch_image).delete(delete_image),
        )
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    pub nombre_archivo: String,
    /// Public path of the stored file
    pub imagen: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ImageModel> for ImageResponse {
    fn from(model: ImageModel) -> Self {
        Self {
            id: model.id,
            nombre_archivo: model.file_name,
            imagen: model.file,
            alt_text: model.alt_text,
            created_at: model.created_at,
        }
    }
}

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    imagen: Vec<u8>,
    nombre_archivo: Option<String>,
    alt_text: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageListParams {
    /// Case-insensitive search over file name and alt text
    pub q: Option<String>,
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::field(NON_FIELD_ERRORS, err.body_text())
}

#[utoipa::path(
    get,
    path = "/api/admin/imagenes/",
    params(PaginationParams, ImageListParams),
    responses(
        (status = 200, description = "Paginated images, newest first", body = PaginatedResponse<ImageResponse>)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn list_images(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<PaginationParams>,
    ApiQuery(params): ApiQuery<ImageListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .services
        .images
        .list(search_param(params.q), pagination.page_request(&state)?)
        .await?;
    Ok(success_response(PaginatedResponse::from_page(
        page,
        ImageResponse::from,
    )))
}

/// Upload an image into the bank
#[utoipa::path(
    post,
    path = "/api/admin/imagenes/",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Missing file, bad extension or too large", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut file_name = None;
    let mut alt_text = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or_default() {
            "imagen" => {
                let original = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((original, bytes.to_vec()));
            }
            "nombre_archivo" => file_name = Some(field.text().await.map_err(multipart_error)?),
            "alt_text" => alt_text = Some(field.text().await.map_err(multipart_error)?),
            other => debug!(field = other, "ignoring unexpected multipart field"),
        }
    }

    let Some((original_name, bytes)) = file else {
        return Err(ApiError::field("imagen", "No file was submitted."));
    };
    let image = state
        .services
        .images
        .upload(ImageUpload {
            original_name,
            bytes,
            file_name,
            alt_text,
        })
        .await?;
    Ok(created_response(ImageResponse::from(image)))
}

#[utoipa::path(
    get,
    path = "/api/admin/imagenes/{id}/",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image", body = ImageResponse),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn get_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.services.images.get(id).await?;
    Ok(success_response(ImageResponse::from(image)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/imagenes/{id}/",
    params(("id" = i32, Path, description = "Image ID")),
    request_body = ImagePatch,
    responses(
        (status = 200, description = "Image metadata updated", body = ImageResponse),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn patch_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    JsonBody(payload): JsonBody<ImagePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.services.images.patch(id, payload).await?;
    Ok(success_response(ImageResponse::from(image)))
}

/// Delete an image, its gallery links and the stored file
#[utoipa::path(
    delete,
    path = "/api/admin/imagenes/{id}/",
    params(("id" = i32, Path, description = "Image ID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.images.delete(id).await?;
    Ok(no_content_response())
}
