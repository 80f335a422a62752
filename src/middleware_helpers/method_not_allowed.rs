use crate::errors::ApiError;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Rewrites the router's bare 405 responses into the JSON error envelope,
/// keeping the `Allow` header.
pub async fn method_not_allowed_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let allow = response
        .headers()
        .get(header::ALLOW)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    ApiError::MethodNotAllowed {
        message: format!("Method \"{}\" not allowed.", method),
        allow,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn wrong_method_gets_json_envelope() {
        let app = Router::new()
            .route("/carousels", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(method_not_allowed_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/carousels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow = response.headers().get(header::ALLOW).unwrap().to_str().unwrap();
        assert!(allow.contains("GET"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["message"], "Method \"POST\" not allowed.");
    }
}
