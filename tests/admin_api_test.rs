mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::{error_fields, response_json, TestApp};
use serde_json::{json, Value};

/// Smallest valid PNG header; the store only checks the extension.
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

async fn upload(app: &TestApp, file_name: &str) -> Value {
    let response = app
        .upload_image(file_name, PNG_BYTES, &[("alt_text", "Vista frontal")])
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

#[tokio::test]
async fn admin_api_requires_the_bearer_token() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/admin/categorias/", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/admin/categorias/", None, Some("wrong"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.admin(Method::GET, "/api/admin/categorias/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_index_lists_managed_resources() {
    let app = TestApp::new().await;
    let response = app.admin(Method::GET, "/api/admin/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["site_header"], "Administración de Mi Tienda");
    let names: Vec<&str> = body["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"categorias"));
    assert!(names.contains(&"filtro-valores"));
    assert!(names.contains(&"content-blocks"));
}

#[tokio::test]
async fn admin_category_list_is_paginated_with_counts() {
    let app = TestApp::new().await;
    let hogar = app.create_category("Hogar").await;
    app.create_category("Oficina").await;
    for name in ["Vela", "Florero"] {
        app.create_article(json!({ "categoria": hogar["id"], "nombre": name, "precio": "9.00" }))
            .await;
    }

    let response = app
        .admin(Method::GET, "/api/admin/categorias/?per_page=1", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["nombre"], "Hogar");
    assert_eq!(body["data"][0]["articulos_count"], 2);

    let body = response_json(
        app.admin(Method::GET, "/api/admin/categorias/?q=ofi", None)
            .await,
    )
    .await;
    assert_eq!(body["data"][0]["nombre"], "Oficina");
    assert_eq!(body["data"][0]["articulos_count"], 0);
}

#[tokio::test]
async fn out_of_range_page_is_a_field_error() {
    let app = TestApp::new().await;
    app.create_category("Hogar").await;

    for uri in [
        "/api/admin/categorias/?page=18446744073709551615&per_page=50",
        "/api/admin/articulos/?page=18446744073709551615",
        "/api/admin/carousels/?page=9223372036854775807&per_page=2",
    ] {
        let response = app.admin(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = response_json(response).await;
        assert_eq!(error_fields(&body), vec!["page".to_string()], "{uri}");
    }

    let response = app
        .admin(Method::GET, "/api/admin/categorias/?page=5", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_matches!(body["data"].as_array(), Some(rows) if rows.is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn admin_articles_filter_on_stock_and_price_buckets() {
    let app = TestApp::new().await;
    for (name, stock, price) in [
        ("Agotado", 0, "10.00"),
        ("Escaso", 5, "60.00"),
        ("Normal", 30, "150.00"),
        ("Abundante", 80, "250.00"),
    ] {
        app.create_article(json!({ "nombre": name, "stock": stock, "precio": price }))
            .await;
    }

    let names = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["nombre"].as_str().unwrap().to_string())
            .collect()
    };

    let body = response_json(
        app.admin(Method::GET, "/api/admin/articulos/?stock=empty", None)
            .await,
    )
    .await;
    assert_eq!(names(&body), vec!["Agotado"]);
    assert_eq!(body["data"][0]["stock_nivel"], "empty");

    let body = response_json(
        app.admin(Method::GET, "/api/admin/articulos/?stock=low", None)
            .await,
    )
    .await;
    assert_eq!(names(&body), vec!["Escaso"]);

    let body = response_json(
        app.admin(Method::GET, "/api/admin/articulos/?precio=high", None)
            .await,
    )
    .await;
    assert_eq!(names(&body), vec!["Abundante"]);
    assert_eq!(body["data"][0]["rango_precio"], "high");

    let body = response_json(
        app.admin(Method::GET, "/api/admin/articulos/?precio=medium&stock=medium", None)
            .await,
    )
    .await;
    assert_eq!(names(&body), vec!["Normal"]);

    let response = app
        .admin(Method::GET, "/api/admin/articulos/?stock=plenty", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_upload_stores_the_file_and_delete_removes_it() {
    let app = TestApp::new().await;
    let image = upload(&app, "Zapatilla Roja.PNG").await;

    assert_eq!(image["nombre_archivo"], "Zapatilla Roja.PNG");
    assert_eq!(image["alt_text"], "Vista frontal");
    let public_path = image["imagen"].as_str().unwrap().to_string();
    assert!(public_path.starts_with("/media/banco_imagenes/zapatilla-roja-"));
    assert!(public_path.ends_with(".png"));

    let relative = public_path.trim_start_matches("/media/");
    let on_disk = app.media_root().join(relative);
    assert!(on_disk.exists());

    let served = app.get(&public_path).await;
    assert_eq!(served.status(), StatusCode::OK);

    let uri = format!("/api/admin/imagenes/{}/", image["id"]);
    let response = app.admin(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!on_disk.exists());

    let response = app.admin(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn image_upload_rejects_unknown_extensions_and_missing_files() {
    let app = TestApp::new().await;

    let response = app.upload_image("notas.txt", b"hola", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["imagen".to_string()]);

    let response = app.upload_image("vacia.png", b"", &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn gallery_keeps_a_single_primary_image() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({ "nombre": "Zapatilla", "precio": "120.00" }))
        .await;
    let first = upload(&app, "frente.png").await;
    let second = upload(&app, "lado.png").await;
    let gallery = format!("/api/admin/articulos/{}/imagenes/", article["id"]);

    let response = app
        .admin(
            Method::POST,
            &gallery,
            Some(json!({ "imagen": first["id"], "es_principal": true, "orden": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first_link = response_json(response).await;

    let response = app
        .admin(
            Method::POST,
            &gallery,
            Some(json!({ "imagen": second["id"], "es_principal": true, "orden": 0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(app.admin(Method::GET, &gallery, None).await).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["imagen"], second["id"]);
    assert_eq!(entries[0]["es_principal"], true);
    assert_eq!(entries[1]["es_principal"], false);

    // Same image twice is rejected
    let response = app
        .admin(Method::POST, &gallery, Some(json!({ "imagen": first["id"] })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["non_field_errors".to_string()]);

    let link_uri = format!("/api/admin/articulo-imagenes/{}/", first_link["id"]);
    let response = app
        .admin(Method::PATCH, &link_uri, Some(json!({ "es_principal": true })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(app.admin(Method::GET, &gallery, None).await).await;
    let primaries: Vec<&Value> = body
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["es_principal"] == true)
        .collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0]["imagen"], first["id"]);

    let response = app.admin(Method::DELETE, &link_uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response_json(app.admin(Method::GET, &gallery, None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn filter_values_are_unique_per_filter_and_counted() {
    let app = TestApp::new().await;

    let response = app
        .admin(Method::POST, "/api/admin/filtros/", Some(json!({ "nombre": "Color" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let color = response_json(response).await;
    let values_uri = format!("/api/admin/filtros/{}/valores/", color["id"]);

    let response = app
        .admin(
            Method::POST,
            &values_uri,
            Some(json!({ "valor": "Rojo", "color_hex": "#FF0000" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let rojo = response_json(response).await;
    assert_eq!(rojo["filtro"], color["id"]);

    let response = app
        .admin(Method::POST, &values_uri, Some(json!({ "valor": "Rojo" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin(
            Method::POST,
            &values_uri,
            Some(json!({ "valor": "Azul", "color_hex": "blue" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["color_hex".to_string()]);

    let response = app
        .admin(Method::POST, "/api/admin/filtros/999/valores/", Some(json!({ "valor": "X" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(app.admin(Method::GET, "/api/admin/filtros/", None).await).await;
    assert_eq!(body["data"][0]["valores_count"], 1);

    let response = app
        .admin(Method::POST, "/api/admin/filtros/", Some(json!({ "nombre": "Color" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn article_filter_values_attach_and_detach() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({ "nombre": "Polo", "precio": "35.00" }))
        .await;
    let talla = response_json(
        app.admin(Method::POST, "/api/admin/filtros/", Some(json!({ "nombre": "Talla" })))
            .await,
    )
    .await;
    let m = response_json(
        app.admin(
            Method::POST,
            &format!("/api/admin/filtros/{}/valores/", talla["id"]),
            Some(json!({ "valor": "M" })),
        )
        .await,
    )
    .await;

    let filters_uri = format!("/api/admin/articulos/{}/filtros/", article["id"]);
    let response = app
        .admin(Method::POST, &filters_uri, Some(json!({ "filtro_valor": m["id"] })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let attached = response_json(response).await;
    assert_eq!(attached["filtro_nombre"], "Talla");
    assert_eq!(attached["valor"], "M");

    let response = app
        .admin(Method::POST, &filters_uri, Some(json!({ "filtro_valor": m["id"] })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let value_uri = format!("/api/admin/filtro-valores/{}/", m["id"]);
    let detail = response_json(app.admin(Method::GET, &value_uri, None).await).await;
    assert_eq!(detail["articulos_count"], 1);
    assert_eq!(detail["filtro_nombre"], "Talla");

    let response = app
        .admin(
            Method::DELETE,
            &format!("/api/admin/articulos/{}/filtros/{}/", article["id"], m["id"]),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response_json(app.admin(Method::GET, &filters_uri, None).await).await;
    assert_matches!(body.as_array(), Some(values) if values.is_empty());
}

async fn create_filter_value(app: &TestApp, filter: &str, value: &str) -> (Value, Value) {
    let filter = response_json(
        app.admin(Method::POST, "/api/admin/filtros/", Some(json!({ "nombre": filter })))
            .await,
    )
    .await;
    let response = app
        .admin(
            Method::POST,
            &format!("/api/admin/filtros/{}/valores/", filter["id"]),
            Some(json!({ "valor": value })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    (filter, response_json(response).await)
}

#[tokio::test]
async fn deleting_filters_and_values_detaches_them_from_articles() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({ "nombre": "Casaca", "precio": "120.00" }))
        .await;
    let (_, negro) = create_filter_value(&app, "Color", "Negro").await;
    let (talla, l) = create_filter_value(&app, "Talla", "L").await;

    let filters_uri = format!("/api/admin/articulos/{}/filtros/", article["id"]);
    for value in [&negro, &l] {
        let response = app
            .admin(Method::POST, &filters_uri, Some(json!({ "filtro_valor": value["id"] })))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let body = response_json(app.admin(Method::GET, &filters_uri, None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app
        .admin(
            Method::DELETE,
            &format!("/api/admin/filtro-valores/{}/", negro["id"]),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response_json(app.admin(Method::GET, &filters_uri, None).await).await;
    let values: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["valor"].as_str().unwrap())
        .collect();
    assert_eq!(values, vec!["L"]);

    let response = app
        .admin(Method::DELETE, &format!("/api/admin/filtros/{}/", talla["id"]), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response_json(app.admin(Method::GET, &filters_uri, None).await).await;
    assert_matches!(body.as_array(), Some(values) if values.is_empty());

    let response = app
        .admin(Method::GET, &format!("/api/admin/filtro-valores/{}/", l["id"]), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app
        .admin(Method::GET, &format!("/api/admin/articulos/{}/", article["id"]), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_article_removes_its_associations() {
    let app = TestApp::new().await;
    let article = app
        .create_article(json!({ "nombre": "Gorra", "precio": "20.00" }))
        .await;
    let image = upload(&app, "gorra.png").await;
    let filter = response_json(
        app.admin(Method::POST, "/api/admin/filtros/", Some(json!({ "nombre": "Material" })))
            .await,
    )
    .await;
    let algodon = response_json(
        app.admin(
            Method::POST,
            &format!("/api/admin/filtros/{}/valores/", filter["id"]),
            Some(json!({ "valor": "Algodón" })),
        )
        .await,
    )
    .await;

    let gallery = format!("/api/admin/articulos/{}/imagenes/", article["id"]);
    app.admin(Method::POST, &gallery, Some(json!({ "imagen": image["id"] })))
        .await;
    app.admin(
        Method::POST,
        &format!("/api/admin/articulos/{}/filtros/", article["id"]),
        Some(json!({ "filtro_valor": algodon["id"] })),
    )
    .await;

    let response = app
        .admin(
            Method::DELETE,
            &format!("/api/admin/articulos/{}/", article["id"]),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The image and the filter value survive, without the article
    let response = app
        .admin(Method::GET, &format!("/api/admin/imagenes/{}/", image["id"]), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = response_json(
        app.admin(
            Method::GET,
            &format!("/api/admin/filtro-valores/{}/", algodon["id"]),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(detail["articulos_count"], 0);
}

#[tokio::test]
async fn settings_are_looked_up_by_key() {
    let app = TestApp::new().await;
    let response = app
        .admin(
            Method::POST,
            "/api/admin/configuracion/",
            Some(json!({ "clave": "moneda", "valor": "PEN", "descripcion": "Moneda" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let setting = response_json(response).await;

    let response = app
        .admin(Method::GET, "/api/admin/configuracion/clave/moneda/", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["id"], setting["id"]);
    assert_eq!(body["valor"], "PEN");

    let response = app
        .admin(Method::GET, "/api/admin/configuracion/clave/idioma/", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .admin(
            Method::POST,
            "/api/admin/configuracion/",
            Some(json!({ "clave": "moneda", "valor": "USD" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["clave".to_string()]);

    let uri = format!("/api/admin/configuracion/{}/", setting["id"]);
    let response = app
        .admin(Method::PATCH, &uri, Some(json!({ "valor": "USD" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["valor"], "USD");
    assert_eq!(body["descripcion"], "Moneda");
}

#[tokio::test]
async fn carousel_slides_are_managed_under_their_carousel() {
    let app = TestApp::new().await;
    let response = app
        .admin(Method::POST, "/api/admin/carousels/", Some(json!({ "nombre": "principal" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let carousel = response_json(response).await;
    let slides_uri = format!("/api/admin/carousels/{}/slides/", carousel["id"]);

    for (title, order) in [("Segundo", 2), ("Primero", 1)] {
        let response = app
            .admin(
                Method::POST,
                &slides_uri,
                Some(json!({
                    "imagen": "carousel_slides/banner.jpg",
                    "titulo": title,
                    "orden": order
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .admin(
            Method::POST,
            &slides_uri,
            Some(json!({ "imagen": "x.jpg", "enlace_url": "no es url" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["enlace_url".to_string()]);

    let body = response_json(app.admin(Method::GET, "/api/admin/carousels/", None).await).await;
    assert_eq!(body["data"][0]["slides_count"], 2);

    let detail = response_json(
        app.admin(
            Method::GET,
            &format!("/api/admin/carousels/{}/", carousel["id"]),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(detail["slides"][0]["titulo"], "Primero");

    let body = response_json(
        app.admin(Method::GET, "/api/admin/carousel-slides/?q=segundo", None)
            .await,
    )
    .await;
    assert_eq!(body["data"][0]["carousel_nombre"], "principal");

    let response = app
        .admin(
            Method::DELETE,
            &format!("/api/admin/carousels/{}/", carousel["id"]),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = response_json(app.admin(Method::GET, "/api/admin/carousel-slides/", None).await).await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn navigation_links_and_content_blocks_crud() {
    let app = TestApp::new().await;

    let response = app
        .admin(
            Method::POST,
            "/api/admin/navigation-links/",
            Some(json!({
                "texto_del_enlace": "Ayuda",
                "url_o_ruta": "/ayuda",
                "ubicacion": "footer_col2"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let link = response_json(response).await;
    assert_eq!(link["ubicacion"], "footer_col2");
    assert_eq!(link["abrir_en_nueva_pestana"], false);

    let uri = format!("/api/admin/navigation-links/{}/", link["id"]);
    let response = app
        .admin(Method::PATCH, &uri, Some(json!({ "ubicacion": "side" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin(Method::PATCH, &uri, Some(json!({ "activo": false })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .admin(
            Method::POST,
            "/api/admin/content-blocks/",
            Some(json!({
                "identificador": "banner-envio-gratis",
                "titulo": "Envío gratis",
                "contenido_html": "<p>Por compras mayores a S/100</p>"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let block = response_json(response).await;

    let response = app
        .admin(
            Method::POST,
            "/api/admin/content-blocks/",
            Some(json!({ "identificador": "banner-envio-gratis" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .admin(
            Method::POST,
            "/api/admin/content-blocks/",
            Some(json!({ "identificador": "con espacios" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(error_fields(&body), vec!["identificador".to_string()]);

    let uri = format!("/api/admin/content-blocks/{}/", block["id"]);
    let response = app.admin(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.admin(Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
