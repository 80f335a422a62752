use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{error::DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Key used when an error cannot be attributed to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Uniform error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Bad Request",
    "message": "Invalid input: sku",
    "fields": { "sku": ["article with this sku already exists."] },
    "request_id": "2f7c1a8e-8c1b-4b8e-9a55-0b7f1f0b6f10",
    "timestamp": "2025-01-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status reason, e.g. "Not Found"
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Per-field messages for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
    /// Request identifier for support and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp when the error occurred
    pub timestamp: String,
}

/// Ordered map of field name to the messages describing what is wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise `ServiceError::InvalidFields`.
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields().collect();
        f.write_str(&names.join(", "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                out.add(field.to_string(), describe_validation_error(error));
            }
        }
        out
    }
}

fn describe_validation_error(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let number = |name: &str| error.params.get(name).and_then(|value| value.as_f64());

    match error.code.as_ref() {
        "length" => {
            let actual = error
                .params
                .get("value")
                .and_then(|value| value.as_str())
                .map(|value| value.chars().count() as f64);
            match (actual, number("min"), number("max")) {
                (Some(len), Some(_), _) if len == 0.0 => "This field may not be blank.".to_string(),
                (Some(len), Some(min), _) if len < min => format!(
                    "Ensure this field has at least {} characters.",
                    display_number(min)
                ),
                (_, _, Some(max)) => format!(
                    "Ensure this field has no more than {} characters.",
                    display_number(max)
                ),
                _ => "Invalid length.".to_string(),
            }
        }
        "range" => match (number("min"), number("max")) {
            (Some(min), _) => format!(
                "Ensure this value is greater than or equal to {}.",
                display_number(min)
            ),
            (None, Some(max)) => format!(
                "Ensure this value is less than or equal to {}.",
                display_number(max)
            ),
            (None, None) => "Value out of range.".to_string(),
        },
        "url" => "Enter a valid URL.".to_string(),
        "required" => "This field is required.".to_string(),
        code => format!("Invalid value ({}).", code),
    }
}

fn display_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidFields(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("unique constraint violated: {}", detail))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                ServiceError::Conflict(format!("foreign key constraint violated: {}", detail))
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::InvalidFields(err.into())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}

impl ServiceError {
    /// Validation failure attributed to a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::InvalidFields(FieldErrors::single(field, message))
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} with id {} not found", resource, id))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidFields(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::DatabaseError(_) | Self::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::StorageError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidFields(fields) => Some(fields),
            _ => None,
        }
    }
}

fn error_body(status: StatusCode, message: String, fields: Option<FieldErrors>) -> Response {
    let body = ErrorResponse {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message,
        fields,
        request_id: current_request_id(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = self.response_message();
        let fields = match self {
            ServiceError::InvalidFields(fields) => Some(fields),
            _ => None,
        };
        error_body(status, message, fields)
    }
}

/// Handler-level error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Invalid input: {0}")]
    InvalidFields(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Method not allowed: {message}")]
    MethodNotAllowed { message: String, allow: String },
}

impl ApiError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidFields(FieldErrors::single(field, message))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::InvalidFields(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ApiError::ServiceError(service_error) => return service_error.into_response(),
            ApiError::InvalidFields(fields) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input: {}", fields),
                Some(fields),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided or are invalid".to_string(),
                None,
            ),
            ApiError::MethodNotAllowed { message, allow } => {
                let mut response = error_body(StatusCode::METHOD_NOT_ALLOWED, message, None);
                // Left unset when empty; the router fills in the real one.
                if !allow.is_empty() {
                    if let Ok(value) = HeaderValue::from_str(&allow) {
                        response.headers_mut().insert(header::ALLOW, value);
                    }
                }
                return response;
            }
        };

        error_body(status, message, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 0))]
        stock: i32,
    }

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("req-123"), async {
                ServiceError::NotFound("missing".into()).into_response()
            })
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
        assert!(payload.fields.is_none());
    }

    #[tokio::test]
    async fn field_errors_are_serialized_per_field() {
        let response = ServiceError::field("sku", "article with this sku already exists.")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            payload["fields"]["sku"][0],
            "article with this sku already exists."
        );
        assert_eq!(payload["error"], "Bad Request");
    }

    #[tokio::test]
    async fn method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed {
            message: "Method \"POST\" not allowed.".into(),
            allow: "GET, HEAD".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");

        let response = ApiError::MethodNotAllowed {
            message: "Method \"POST\" not allowed.".into(),
            allow: String::new(),
        }
        .into_response();
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::field("x", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::StorageError("disk".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        assert_eq!(
            ServiceError::StorageError("/var/media is read-only".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("secret".into())).response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::NotFound("Category not found".into()).response_message(),
            "Not found: Category not found"
        );
    }

    #[test]
    fn validator_errors_become_field_errors() {
        let sample = Sample {
            name: "too long name".into(),
            stock: -1,
        };
        let err: ServiceError = sample.validate().unwrap_err().into();
        assert_matches!(err, ServiceError::InvalidFields(ref fields) if fields.contains("name") && fields.contains("stock"));
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields.get("stock").unwrap()[0],
            "Ensure this value is greater than or equal to 0."
        );
    }

    #[test]
    fn field_errors_merge_keeps_every_message() {
        let mut errors = FieldErrors::single("nombre", "first");
        errors.merge(FieldErrors::single("nombre", "second"));
        errors.add("slug", "third");
        assert_eq!(errors.get("nombre").unwrap().len(), 2);
        assert_eq!(errors.to_string(), "nombre, slug");
        assert!(errors.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
