use crate::handlers::{
    catalog::{articles, categories, configuration, filters, images},
    index,
    merchandising::{carousels, content_blocks, navigation_links},
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Admin token configured as `admin_token`"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = r#"
# Catalog Management API

Public read/write endpoints for categories and articles, read-only
storefront widgets (carousels, navigation links, content blocks) and a
bearer-protected admin API under `/api/admin`.

## Errors

Every error uses the same envelope:

```json
{
  "error": "Bad Request",
  "message": "Invalid input: sku",
  "fields": { "sku": ["article with this sku already exists."] },
  "request_id": "…",
  "timestamp": "2025-01-01T00:00:00Z"
}
```

## Pagination

Admin lists take `page` (default 1) and `per_page` and answer with
`{ "data": [...], "pagination": { page, per_page, total, total_pages } }`.
Public lists are plain arrays.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "Catalog", description = "Categories and articles"),
        (name = "Merchandising", description = "Carousels, navigation links and content blocks"),
        (name = "Admin", description = "Back-office management endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        index::api_root,
        index::admin_index,

        // Categories
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::patch_category,
        categories::delete_category,
        categories::admin_list_categories,
        categories::admin_get_category,

        // Articles
        articles::list_articles,
        articles::create_article,
        articles::get_article,
        articles::update_article,
        articles::patch_article,
        articles::delete_article,
        articles::admin_list_articles,
        articles::admin_get_article,
        articles::list_gallery,
        articles::attach_image,
        articles::update_gallery_entry,
        articles::detach_image,
        articles::list_article_filters,
        articles::attach_filter_value,
        articles::detach_filter_value,

        // Image bank
        images::list_images,
        images::upload_image,
        images::get_image,
        images::patch_image,
        images::delete_image,

        // Facets
        filters::list_filters,
        filters::create_filter,
        filters::get_filter,
        filters::update_filter,
        filters::patch_filter,
        filters::delete_filter,
        filters::list_values_of_filter,
        filters::create_value,
        filters::list_values,
        filters::get_value,
        filters::patch_value,
        filters::delete_value,

        // Settings
        configuration::list_settings,
        configuration::create_setting,
        configuration::get_setting,
        configuration::get_setting_by_key,
        configuration::update_setting,
        configuration::patch_setting,
        configuration::delete_setting,

        // Carousels
        carousels::list_carousels,
        carousels::get_carousel,
        carousels::admin_list_carousels,
        carousels::create_carousel,
        carousels::admin_get_carousel,
        carousels::update_carousel,
        carousels::patch_carousel,
        carousels::delete_carousel,
        carousels::list_slides_of_carousel,
        carousels::create_slide,
        carousels::list_slides,
        carousels::get_slide,
        carousels::patch_slide,
        carousels::delete_slide,

        // Navigation links
        navigation_links::list_links,
        navigation_links::get_link,
        navigation_links::admin_list_links,
        navigation_links::create_link,
        navigation_links::admin_get_link,
        navigation_links::update_link,
        navigation_links::patch_link,
        navigation_links::delete_link,

        // Content blocks
        content_blocks::list_blocks,
        content_blocks::get_block,
        content_blocks::admin_list_blocks,
        content_blocks::create_block,
        content_blocks::admin_get_block,
        content_blocks::update_block,
        content_blocks::patch_block,
        content_blocks::delete_block,

        crate::health::health_check,
        crate::health::readiness_check,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::entities::merchandising::LinkLocation,
        )
    ),
    modifiers(&BearerSecurity)
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_and_admin_paths() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Catalog API"));
        assert!(json.contains("/api/articulos/"));
        assert!(json.contains("/api/admin/filtro-valores/{id}/"));
        assert!(json.contains("\"Bearer\""));
    }
}
