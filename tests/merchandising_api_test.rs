mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::{json, Value};

async fn admin_create(app: &TestApp, uri: &str, body: Value) -> Value {
    let response = app.admin(Method::POST, uri, Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED, "{uri}");
    response_json(response).await
}

#[tokio::test]
async fn storefront_carousel_shows_only_active_slides_in_order() {
    let app = TestApp::new().await;
    let principal = admin_create(&app, "/api/admin/carousels/", json!({ "nombre": "principal" })).await;
    admin_create(
        &app,
        "/api/admin/carousels/",
        json!({ "nombre": "temporada", "activo": false }),
    )
    .await;

    let slides = format!("/api/admin/carousels/{}/slides/", principal["id"]);
    for (title, order, active) in [("B", 2, true), ("Oculto", 0, false), ("A", 1, true)] {
        admin_create(
            &app,
            &slides,
            json!({ "imagen": "carousel_slides/s.jpg", "titulo": title, "orden": order, "activo": active }),
        )
        .await;
    }

    let body = response_json(app.get("/api/carousels/").await).await;
    let carousels = body.as_array().unwrap();
    assert_eq!(carousels.len(), 1);
    assert_eq!(carousels[0]["nombre"], "principal");

    let body = response_json(app.get("/api/carousels/?nombre=principal").await).await;
    let titles: Vec<&str> = body[0]["slides"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["titulo"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "B"]);

    let body = response_json(app.get("/api/carousels/?nombre=temporada").await).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app.get(&format!("/api/carousels/{}/", principal["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inactive_carousel_is_hidden_from_the_storefront() {
    let app = TestApp::new().await;
    let hidden = admin_create(
        &app,
        "/api/admin/carousels/",
        json!({ "nombre": "borrador", "activo": false }),
    )
    .await;

    let response = app.get(&format!("/api/carousels/{}/", hidden["id"])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .admin(Method::GET, &format!("/api/admin/carousels/{}/", hidden["id"]), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn navigation_links_filter_by_location() {
    let app = TestApp::new().await;
    for (text, location, order, active) in [
        ("Contacto", "header", 3, true),
        ("Inicio", "header", 0, true),
        ("Ayuda", "footer_col1", 0, true),
        ("Viejo", "header", 1, false),
    ] {
        admin_create(
            &app,
            "/api/admin/navigation-links/",
            json!({
                "texto_del_enlace": text,
                "url_o_ruta": format!("/{}", text.to_lowercase()),
                "ubicacion": location,
                "orden": order,
                "activo": active
            }),
        )
        .await;
    }

    let body = response_json(app.get("/api/navigation-links/?ubicacion=header").await).await;
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["texto_del_enlace"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Inicio", "Contacto"]);

    let body = response_json(app.get("/api/navigation-links/").await).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let response = app.get("/api/navigation-links/?ubicacion=sidebar").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn content_blocks_are_found_by_identifier() {
    let app = TestApp::new().await;
    let banner = admin_create(
        &app,
        "/api/admin/content-blocks/",
        json!({
            "identificador": "banner-envio-gratis",
            "titulo": "Envío gratis",
            "enlace_url": "https://mitienda.com/envios"
        }),
    )
    .await;
    let hidden = admin_create(
        &app,
        "/api/admin/content-blocks/",
        json!({ "identificador": "promo-oculta", "activo": false }),
    )
    .await;

    let body = response_json(
        app.get("/api/content-blocks/?identificador=banner-envio-gratis")
            .await,
    )
    .await;
    let blocks = body.as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["id"], banner["id"]);
    assert_eq!(blocks[0]["titulo"], "Envío gratis");

    let body = response_json(app.get("/api/content-blocks/?identificador=promo-oculta").await).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app.get(&format!("/api/content-blocks/{}/", hidden["id"])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storefront_widgets_are_read_only() {
    let app = TestApp::new().await;
    for uri in [
        "/api/carousels/",
        "/api/navigation-links/",
        "/api/content-blocks/",
    ] {
        let response = app
            .request(Method::POST, uri, Some(json!({})), None)
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
    }
}
