use crate::{
    errors::{ApiError, FieldErrors, NON_FIELD_ERRORS},
    services::{Page, PageRequest},
    AppState,
};
use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// JSON body whose rejections become field errors in the standard envelope.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::InvalidFields(json_rejection_fields(&rejection))),
        }
    }
}

fn json_rejection_fields(rejection: &JsonRejection) -> FieldErrors {
    match rejection {
        JsonRejection::JsonDataError(_) => deserialize_error_fields(&rejection.body_text()),
        JsonRejection::JsonSyntaxError(_) => FieldErrors::single(
            NON_FIELD_ERRORS,
            format!("JSON parse error - {}", strip_context(&rejection.body_text())),
        ),
        JsonRejection::MissingJsonContentType(_) => FieldErrors::single(
            NON_FIELD_ERRORS,
            "Unsupported media type. Expected 'Content-Type: application/json'.",
        ),
        _ => FieldErrors::single(NON_FIELD_ERRORS, rejection.body_text()),
    }
}

fn strip_context(text: &str) -> &str {
    text.split_once(": ").map_or(text, |(_, rest)| rest)
}

/// Attributes a serde data error to the field it names.
///
/// The text looks like `Failed to ...: precio: invalid type: ... at line 1 column 12`
/// or `Failed to ...: missing field `nombre` at line 1 column 2`.
pub(crate) fn deserialize_error_fields(text: &str) -> FieldErrors {
    let detail = strip_context(text);
    let detail = detail
        .rsplit_once(" at line ")
        .map_or(detail, |(head, _)| head);

    if let Some(rest) = detail.split("missing field `").nth(1) {
        if let Some((field, _)) = rest.split_once('`') {
            return FieldErrors::single(field, "This field is required.");
        }
    }

    match detail.split_once(": ") {
        Some((path, message)) if path != "." && !path.contains(' ') => {
            let field = path
                .split(|c| c == '.' || c == '[')
                .find(|segment| !segment.is_empty())
                .unwrap_or(NON_FIELD_ERRORS);
            FieldErrors::single(field, capitalize(message))
        }
        _ => FieldErrors::single(NON_FIELD_ERRORS, capitalize(detail)),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}

/// Path parameters; a value that does not parse is an unknown resource.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|_| ApiError::NotFound("Not found.".to_string()))
    }
}

/// Query string extractor reporting malformed parameters in the standard envelope.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection: QueryRejection| {
                ApiError::InvalidFields(deserialize_error_fields(&rejection.body_text()))
            })
    }
}

/// Parses a boolean query filter. Blank means "not filtered".
pub fn parse_bool_param(field: &str, value: Option<&str>) -> Result<Option<bool>, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw {
        "true" | "True" | "1" => Ok(Some(true)),
        "false" | "False" | "0" => Ok(Some(false)),
        _ => Err(ApiError::field(field, "Must be a valid boolean.")),
    }
}

/// Parses an integer id query filter. Blank means "not filtered".
pub fn parse_id_param(field: &str, value: Option<&str>) -> Result<Option<i32>, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::field(field, "Enter a whole number."))
}

/// Parses a choice query filter through the type's `FromStr`.
pub fn parse_choice_param<T>(field: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = String>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|raw| raw.parse::<T>().map_err(|message| ApiError::field(field, message)))
        .transpose()
}

/// Blank search strings mean no search.
pub fn search_param(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Pagination parameters for admin list operations
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// One-based page number
    pub page: Option<u64>,
    /// Page size, capped by configuration
    pub per_page: Option<u64>,
}

impl PaginationParams {
    /// Rejects a page whose row offset does not fit a SQL `OFFSET`.
    pub fn page_request(&self, state: &AppState) -> Result<PageRequest, ApiError> {
        let request = PageRequest::new(
            self.page.unwrap_or(1),
            state.config.clamp_page_size(self.per_page),
        );
        match request.offset() {
            Some(_) => Ok(request),
            None => Err(ApiError::field("page", "Invalid page.")),
        }
    }
}

/// Standard pagination response metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(per_page.max(1))
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, per_page, total),
        }
    }

    /// Converts a service page, mapping each item into its response shape.
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let Page {
            items,
            total,
            page,
            per_page,
        } = page;
        Self::new(items.into_iter().map(f).collect(), page, per_page, total)
    }
}

/// Registers a route both with and without its trailing slash.
pub trait RouterExt<S> {
    fn route_slash(self, path: &str, method_router: MethodRouter<S>) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn route_slash(self, path: &str, method_router: MethodRouter<S>) -> Self {
        let trimmed = path.trim_end_matches('/');
        self.route(trimmed, method_router.clone())
            .route(&format!("{}/", trimmed), method_router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn missing_field_is_attributed() {
        let fields = deserialize_error_fields(
            "Failed to deserialize the JSON body into the target type: missing field `nombre` at line 1 column 2",
        );
        assert_eq!(fields.get("nombre").unwrap()[0], "This field is required.");
    }

    #[test]
    fn wrong_type_names_the_path_head() {
        let fields = deserialize_error_fields(
            "Failed to deserialize the JSON body into the target type: stock: invalid type: string \"x\", expected i32 at line 1 column 12",
        );
        assert!(fields.contains("stock"));

        let fields = deserialize_error_fields(
            "Failed to deserialize query string: page: invalid digit found in string",
        );
        assert_eq!(
            fields.get("page").unwrap()[0],
            "Invalid digit found in string."
        );
    }

    #[test]
    fn unattributed_errors_land_in_non_field_errors() {
        let fields = deserialize_error_fields(
            "Failed to deserialize the JSON body into the target type: invalid type: sequence, expected struct CategoryDraft at line 1 column 0",
        );
        assert!(fields.contains(NON_FIELD_ERRORS));
    }

    #[test_case(Some("true"), Some(true))]
    #[test_case(Some("False"), Some(false))]
    #[test_case(Some("1"), Some(true))]
    #[test_case(Some(" "), None)]
    #[test_case(None, None)]
    fn bool_params(raw: Option<&str>, expected: Option<bool>) {
        assert_eq!(parse_bool_param("activo", raw).unwrap(), expected);
    }

    #[test]
    fn bad_params_are_field_errors() {
        assert!(parse_bool_param("activo", Some("maybe")).is_err());
        assert!(parse_id_param("categoria", Some("abc")).is_err());
        assert_eq!(parse_id_param("categoria", Some("7")).unwrap(), Some(7));
    }

    #[test_case(None, Some(1))]
    #[test_case(Some(3), Some(3))]
    #[test_case(Some(u64::MAX), None)]
    #[test_case(Some(i64::MAX as u64 / 50 + 2), None)]
    fn page_request_rejects_out_of_range_pages(page: Option<u64>, expected: Option<u64>) {
        let request = PageRequest::new(page.unwrap_or(1), 50);
        assert_eq!(request.offset().map(|_| request.page), expected);
    }

    #[test]
    fn pagination_meta_rounds_up() {
        let meta = PaginationMeta::new(1, 20, 41);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PaginationMeta::new(1, 20, 0).total_pages, 0);
    }
}
