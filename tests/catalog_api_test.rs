mod common;

use axum::http::{header, Method, StatusCode};
use catalog_api::entities::catalog::{article, Article};
use chrono::{TimeZone, Utc};
use common::{error_fields, response_json, TestApp};
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{json, Value};

#[tokio::test]
async fn category_slug_is_derived_from_the_name() {
    let app = TestApp::new().await;

    let category = app.create_category("Ropa de Niños").await;
    assert_eq!(category["slug"], "ropa-de-ninos");
    assert_eq!(category["activo"], true);
    assert_eq!(category["orden"], 0);

    let response = app
        .request(
            Method::POST,
            "/api/categorias/",
            Some(json!({ "nombre": "ROPA DE NIÑOS!" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["slug".to_string()]);
}

#[tokio::test]
async fn duplicate_category_name_is_a_field_error() {
    let app = TestApp::new().await;
    app.create_category("Calzado").await;

    let response = app
        .request(
            Method::POST,
            "/api/categorias/",
            Some(json!({ "nombre": "Calzado", "slug": "calzado-2" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(error_fields(&body).contains(&"nombre".to_string()));
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn categories_are_listed_by_order_then_name() {
    let app = TestApp::new().await;
    for (name, order) in [("Zapatos", 0), ("Accesorios", 2), ("Bolsos", 0)] {
        let response = app
            .request(
                Method::POST,
                "/api/categorias/",
                Some(json!({ "nombre": name, "orden": order })),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = response_json(app.get("/api/categorias/").await).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bolsos", "Zapatos", "Accesorios"]);
}

#[tokio::test]
async fn deleting_a_category_keeps_its_articles() {
    let app = TestApp::new().await;
    let category = app.create_category("Electrónica").await;
    let article = app
        .create_article(json!({
            "categoria": category["id"],
            "nombre": "Audífonos",
            "precio": "59.90",
            "stock": 4
        }))
        .await;
    assert_eq!(article["categoria_nombre"], "Electrónica");

    let uri = format!("/api/categorias/{}/", category["id"]);
    let response = app.request(Method::DELETE, &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/articulos/{}/", article["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["categoria"].is_null());
    assert!(body["categoria_nombre"].is_null());
}

#[tokio::test]
async fn article_price_is_returned_with_two_decimals() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({ "nombre": "Lámpara", "precio": 25, "stock": 3 }))
        .await;

    assert_eq!(article["precio"], "25.00");
    assert_eq!(article["activo"], true);
    assert_eq!(article["destacado"], false);
    assert!(article["sku"].is_null());
    assert!(article["descripcion"].is_null());
}

#[tokio::test]
async fn article_validation_reports_each_bad_field() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/articulos/",
            Some(json!({ "nombre": "Mesa", "precio": "-1.00", "stock": -2 })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    let fields = error_fields(&body);
    assert!(fields.contains(&"precio".to_string()));
    assert!(fields.contains(&"stock".to_string()));
}

#[tokio::test]
async fn duplicate_sku_is_rejected_but_blank_skus_are_not() {
    let app = TestApp::new().await;
    app.create_article(json!({ "nombre": "Silla", "precio": "80.00", "sku": "SIL-001" }))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/articulos/",
            Some(json!({ "nombre": "Silla azul", "precio": "85.00", "sku": "SIL-001" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["sku".to_string()]);

    for name in ["Banco", "Taburete"] {
        let article = app
            .create_article(json!({ "nombre": name, "precio": "10.00", "sku": "  " }))
            .await;
        assert!(article["sku"].is_null());
    }
}

#[tokio::test]
async fn article_list_filters_by_category_and_flags() {
    let app = TestApp::new().await;
    let hogar = app.create_category("Hogar").await;
    let jardin = app.create_category("Jardín").await;

    app.create_article(json!({
        "categoria": hogar["id"], "nombre": "Cojín", "precio": "15.00", "destacado": true
    }))
    .await;
    app.create_article(json!({
        "categoria": hogar["id"], "nombre": "Cortina", "precio": "45.00", "activo": false
    }))
    .await;
    app.create_article(json!({
        "categoria": jardin["id"], "nombre": "Maceta", "precio": "12.00"
    }))
    .await;

    let uri = format!("/api/articulos/?categoria={}", hogar["id"]);
    let body = response_json(app.get(&uri).await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let uri = format!("/api/articulos/?categoria={}&activo=true", hogar["id"]);
    let body = response_json(app.get(&uri).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["nombre"], "Cojín");

    let body = response_json(app.get("/api/articulos/?destacado=true").await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

async fn set_created_at(app: &TestApp, article: &Value, day: u32) {
    let created_at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
    Article::update_many()
        .col_expr(article::Column::CreatedAt, Expr::value(created_at))
        .filter(article::Column::Id.eq(article["id"].as_i64().unwrap() as i32))
        .exec(app.state.db.as_ref())
        .await
        .unwrap();
}

#[tokio::test]
async fn active_articles_of_a_category_are_newest_first_then_by_name() {
    let app = TestApp::new().await;
    let oficina = app.create_category("Oficina").await;
    let otra = app.create_category("Otra").await;

    for (name, day, category, active) in [
        ("Grapadora", 1, &oficina, true),
        ("Lapicero", 3, &oficina, true),
        ("Agenda", 3, &oficina, true),
        ("Archivador", 5, &oficina, false),
        ("Cuaderno", 7, &otra, true),
    ] {
        let article = app
            .create_article(json!({
                "categoria": category["id"], "nombre": name, "precio": "4.50", "activo": active
            }))
            .await;
        set_created_at(&app, &article, day).await;
    }

    let uri = format!("/api/articulos/?categoria={}&activo=true", oficina["id"]);
    let body = response_json(app.get(&uri).await).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Agenda", "Lapicero", "Grapadora"]);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["categoria"] == oficina["id"] && a["activo"] == true));
}

#[tokio::test]
async fn malformed_or_unknown_category_filter_is_a_bad_request() {
    let app = TestApp::new().await;

    let response = app.get("/api/articulos/?categoria=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/articulos/?categoria=9999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["categoria".to_string()]);
}

#[tokio::test]
async fn creating_an_article_in_a_missing_category_fails() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/articulos/",
            Some(json!({ "nombre": "Huérfano", "precio": "1.00", "categoria": 42 })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["categoria".to_string()]);
}

#[tokio::test]
async fn patch_changes_only_the_given_fields() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({
            "nombre": "Termo", "precio": "30.00", "stock": 20, "sku": "TER-1"
        }))
        .await;
    let uri = format!("/api/articulos/{}/", article["id"]);

    let response = app
        .request(Method::PATCH, &uri, Some(json!({ "stock": 5 })), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["stock"], 5);
    assert_eq!(body["sku"], "TER-1");
    assert_eq!(body["precio"], "30.00");
}

#[tokio::test]
async fn put_replaces_the_whole_article() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({
            "nombre": "Termo", "precio": "30.00", "sku": "TER-1", "destacado": true
        }))
        .await;
    let uri = format!("/api/articulos/{}/", article["id"]);

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(json!({ "nombre": "Termo grande", "precio": "35.50" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["nombre"], "Termo grande");
    assert_eq!(body["precio"], "35.50");
    assert!(body["sku"].is_null());
    assert_eq!(body["destacado"], false);
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_not_found() {
    let app = TestApp::new().await;

    for uri in ["/api/articulos/999/", "/api/articulos/abc/", "/api/categorias/0"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = response_json(response).await;
        assert_eq!(body["error"], "Not Found");
    }
}

#[tokio::test]
async fn trailing_slash_is_optional() {
    let app = TestApp::new().await;
    app.create_category("Deportes").await;

    for uri in ["/api/categorias", "/api/categorias/"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = response_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn api_root_lists_public_resources() {
    let app = TestApp::new().await;
    let response = app.get("/api/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["categorias"], "/api/categorias/");
    assert_eq!(body["articulos"], "/api/articulos/");
    assert!(body.get("carousels").is_some());
}

#[tokio::test]
async fn wrong_method_is_rejected_with_allow_header() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::POST, "/api/carousels/", Some(json!({})), None)
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let allow = response
        .headers()
        .get(header::ALLOW)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(allow.contains("GET"));
    let body = response_json(response).await;
    assert_eq!(body["error"], "Method Not Allowed");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;
    let response = app.get("/api/no-such-thing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_endpoints_report_status() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
}
