//! Catalog API Library
//!
//! Categories, articles, the image bank, facets, site settings and
//! storefront merchandising, served as a public REST API under `/api` and a
//! bearer-protected admin API under `/api/admin`.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    services::ServeDir,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::from_config(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Builds the complete HTTP application: public and admin APIs, media files,
/// health, OpenAPI and the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let cfg = state.config.clone();

    let admin = handlers::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        middleware_helpers::admin_auth_middleware,
    ));

    let media_prefix = cfg.media_url.trim_end_matches('/');
    let media_prefix = if media_prefix.is_empty() {
        "/media"
    } else {
        media_prefix
    };

    Router::new()
        .merge(handlers::public_routes())
        .merge(admin)
        .merge(health::health_routes())
        .nest_service(media_prefix, ServeDir::new(cfg.media_root_path()))
        .fallback(not_found_fallback)
        .with_state(state)
        .merge(openapi::swagger_ui())
        .layer(middleware::from_fn(
            middleware_helpers::method_not_allowed_middleware,
        ))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(cfg.max_body_size))
        // Ensure every request carries a request id for traceability
        .layer(middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
}

async fn not_found_fallback() -> errors::ApiError {
    errors::ApiError::NotFound("Not found.".to_string())
}

/// CORS from configuration: explicit origins win, then the permissive
/// fallback allowed in development or by override, else same-origin only.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(cfg.cors_allow_credentials)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            environment = %cfg.environment,
            "Using permissive CORS because explicit origins were not configured"
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::errors::{ApiError, FieldErrors, ServiceError};
    pub use crate::services::{Page, PageRequest};
    pub use crate::{build_router, AppState};
}
