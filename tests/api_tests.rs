use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vitrina::config::Config;

/// Default credentials seeded by migration (must match m20240302_add_users.rs)
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "password";

const BOUNDARY: &str = "----vitrina-test-boundary";

async fn spawn_app() -> (Router, tempfile::TempDir) {
    let uploads_dir = tempfile::tempdir().expect("Failed to create temp uploads dir");

    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory db.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.general.uploads_path = uploads_dir.path().to_string_lossy().to_string();
    config.server.secure_cookies = false;

    let state = vitrina::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    (vitrina::api::router(state).await, uploads_dir)
}

/// Log in with the seeded credentials and return the session cookie.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": DEFAULT_USERNAME,
                        "password": DEFAULT_PASSWORD,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login did not set a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, cookie: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Assemble a multipart/form-data body with text fields and an optional file
/// under the "image" field.
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

async fn create_product(app: &Router, cookie: &str, name: &str, active: bool) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/products",
            cookie,
            &serde_json::json!({
                "name": name,
                "description": "Handmade leather bag",
                "price": 4500,
                "active": active,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_auth_flow() {
    let (app, _uploads) = spawn_app().await;

    // Admin routes are closed without a session
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong password is rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": DEFAULT_USERNAME,
                        "password": "wrong-password",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid login opens the admin routes
    let cookie = login(&app).await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Check endpoint reports the session
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["username"], DEFAULT_USERNAME);

    // Logout invalidates the cookie
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_crud() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let id = create_product(&app, &cookie, "Tote", true).await;

    // Visible through the public API
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "Tote");
    assert_eq!(body["data"]["price"], 4500);
    assert_eq!(body["data"]["total_variations"], 0);

    // Update
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/products/{id}"),
            &cookie,
            &serde_json::json!({
                "name": "Tote XL",
                "description": "Bigger",
                "price": 5200,
                "active": true,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "Tote XL");
    assert_eq!(body["data"]["price"], 5200);

    // Updating a missing product is a 404
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/admin/products/99999",
            &cookie,
            &serde_json::json!({
                "name": "Ghost",
                "price": 100,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete, then the public API forgets it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/products/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    // Blank name
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/products",
            &cookie,
            &serde_json::json!({ "name": "   ", "price": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Non-positive prices
    for price in [0, -5] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/products",
                &cookie,
                &serde_json::json!({ "name": "Clutch", "price": price }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_public_listing_excludes_inactive() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let _visible = create_product(&app, &cookie, "Visible", true).await;
    let hidden = create_product(&app, &cookie, "Hidden", false).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Visible"]);

    // A direct public fetch of the hidden product is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{hidden}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // But the admin listing sees both
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_without_active_keeps_product_hidden() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let id = create_product(&app, &cookie, "Archived", false).await;

    // An update payload that says nothing about visibility
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/products/{id}"),
            &cookie,
            &serde_json::json!({
                "name": "Archived v2",
                "price": 3100,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Still hidden in the admin listing
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/products")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    let product = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"].as_i64() == Some(id))
        .unwrap();
    assert_eq!(product["name"], "Archived v2");
    assert_eq!(product["active"], false);

    // And still invisible to the public
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // An explicit flag flips it back on
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/products/{id}"),
            &cookie,
            &serde_json::json!({
                "name": "Archived v2",
                "price": 3100,
                "active": true,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_variations_and_gallery() {
    let (app, uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Satchel", true).await;

    // Variation with an uploaded primary image
    let body = multipart_body(
        &[
            ("product_id", &product_id.to_string()),
            ("color", "Brown"),
            ("stock", "3"),
        ],
        Some(("brown.png", b"fake png bytes")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    let variation_id = created["data"]["id"].as_i64().unwrap();
    let image_name = created["data"]["image"].as_str().unwrap().to_string();
    assert!(image_name.ends_with(".png"));
    assert!(uploads.path().join(&image_name).exists());

    // Gallery images append at the end of the ordering
    let mut positions = Vec::new();
    for filename in ["one.jpg", "two.jpg"] {
        let body = multipart_body(&[], Some((filename, b"jpeg bytes")));
        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                &format!("/api/admin/variations/{variation_id}/gallery"),
                &cookie,
                body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        positions.push(body["data"]["position"].as_i64().unwrap());
    }
    assert_eq!(positions, vec![1, 2]);

    // Public product carries the whole tree
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_variations"], 1);
    let variation = &body["data"]["variations"][0];
    assert_eq!(variation["color"], "Brown");
    assert_eq!(variation["stock"], 3);
    assert_eq!(variation["gallery"].as_array().unwrap().len(), 2);

    // Orphan variations are rejected
    let body = multipart_body(&[("product_id", "99999"), ("color", "Red")], None);
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // So are gallery appends to missing variations
    let body = multipart_body(&[], Some(("stray.jpg", b"bytes")));
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations/99999/gallery",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_variation_replaces_primary_image() {
    let (app, uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Hobo", true).await;

    let body = multipart_body(
        &[
            ("product_id", &product_id.to_string()),
            ("color", "Olive"),
            ("stock", "2"),
        ],
        Some(("olive.png", b"old png bytes")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let variation_id = created["data"]["id"].as_i64().unwrap();
    let old_image = created["data"]["image"].as_str().unwrap().to_string();
    assert!(uploads.path().join(&old_image).exists());

    // New color, stock and image in one update
    let body = multipart_body(
        &[("color", "Forest"), ("stock", "9")],
        Some(("forest.jpg", b"new jpg bytes")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            &format!("/api/admin/variations/{variation_id}"),
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    let new_image = updated["data"]["image"].as_str().unwrap().to_string();
    assert_ne!(new_image, old_image);

    // The replacement lands on disk and the old file is gone
    assert!(uploads.path().join(&new_image).exists());
    assert!(!uploads.path().join(&old_image).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    let variation = &body["data"]["variations"][0];
    assert_eq!(variation["color"], "Forest");
    assert_eq!(variation["stock"], 9);
    assert_eq!(variation["image"], new_image);

    // Missing variations return a 404
    let body = multipart_body(&[("color", "Ghost")], None);
    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            "/api/admin/variations/99999",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_variation_cascades_to_gallery_and_files() {
    let (app, uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Duffel", true).await;

    let body = multipart_body(
        &[
            ("product_id", &product_id.to_string()),
            ("color", "Slate"),
            ("stock", "4"),
        ],
        Some(("slate.webp", b"webp bytes")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let variation_id = created["data"]["id"].as_i64().unwrap();
    let primary_image = created["data"]["image"].as_str().unwrap().to_string();

    let body = multipart_body(&[], Some(("detail.jpg", b"jpg bytes")));
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            &format!("/api/admin/variations/{variation_id}/gallery"),
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let appended = json_body(response).await;
    let gallery_image = appended["data"]["image"].as_str().unwrap().to_string();

    assert!(uploads.path().join(&primary_image).exists());
    assert!(uploads.path().join(&gallery_image).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/variations/{variation_id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Primary and gallery files are gone from disk
    assert!(!uploads.path().join(&primary_image).exists());
    assert!(!uploads.path().join(&gallery_image).exists());

    // The product survives with an empty variation list
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["total_variations"], 0);

    // Deleting it twice is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/variations/{variation_id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_gallery_image_removes_row_and_file() {
    let (app, uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Messenger", true).await;

    let body = multipart_body(
        &[("product_id", &product_id.to_string()), ("color", "Navy")],
        None,
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let variation_id = created["data"]["id"].as_i64().unwrap();

    let mut image_ids = Vec::new();
    let mut filenames = Vec::new();
    for filename in ["front.jpg", "back.jpg"] {
        let body = multipart_body(&[], Some((filename, b"jpg bytes")));
        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                &format!("/api/admin/variations/{variation_id}/gallery"),
                &cookie,
                body,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        image_ids.push(body["data"]["id"].as_i64().unwrap());
        filenames.push(body["data"]["image"].as_str().unwrap().to_string());
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/gallery/{}", image_ids[0]))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // File gone, the other one untouched
    assert!(!uploads.path().join(&filenames[0]).exists());
    assert!(uploads.path().join(&filenames[1]).exists());

    // Only the second image remains in the tree
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/products/{product_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    let gallery = body["data"]["variations"][0]["gallery"].as_array().unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0]["image"], filenames[1].as_str());

    // Deleting a missing row is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/gallery/99999")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_extension_whitelist() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Backpack", true).await;

    let body = multipart_body(
        &[("product_id", &product_id.to_string()), ("color", "Black")],
        Some(("payload.exe", b"MZ")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_product_cascades_to_files() {
    let (app, uploads) = spawn_app().await;
    let cookie = login(&app).await;

    let product_id = create_product(&app, &cookie, "Crossbody", true).await;

    let body = multipart_body(
        &[
            ("product_id", &product_id.to_string()),
            ("color", "Tan"),
            ("stock", "1"),
        ],
        Some(("tan.webp", b"webp bytes")),
    );
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            "/api/admin/variations",
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let created = json_body(response).await;
    let variation_id = created["data"]["id"].as_i64().unwrap();
    let primary_image = created["data"]["image"].as_str().unwrap().to_string();

    let body = multipart_body(&[], Some(("extra.gif", b"gif bytes")));
    let response = app
        .clone()
        .oneshot(multipart_request(
            "POST",
            &format!("/api/admin/variations/{variation_id}/gallery"),
            &cookie,
            body,
        ))
        .await
        .unwrap();
    let appended = json_body(response).await;
    let gallery_image = appended["data"]["image"].as_str().unwrap().to_string();

    assert!(uploads.path().join(&primary_image).exists());
    assert!(uploads.path().join(&gallery_image).exists());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/products/{product_id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!uploads.path().join(&primary_image).exists());
    assert!(!uploads.path().join(&gallery_image).exists());
}

#[tokio::test]
async fn test_change_password() {
    let (app, _uploads) = spawn_app().await;
    let cookie = login(&app).await;

    // Wrong current password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            &cookie,
            &serde_json::json!({
                "current_password": "not-the-password",
                "new_password": "much-better-secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Too-short replacement
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            &cookie,
            &serde_json::json!({
                "current_password": DEFAULT_PASSWORD,
                "new_password": "short",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid change, then the new password logs in
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/change-password",
            &cookie,
            &serde_json::json!({
                "current_password": DEFAULT_PASSWORD,
                "new_password": "much-better-secret",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": DEFAULT_USERNAME,
                        "password": "much-better-secret",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
