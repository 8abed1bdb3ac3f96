mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};

use support::{admin_post, json_request, login, send, spawn_app};

#[tokio::test]
async fn admin_routes_require_token() -> anyhow::Result<()> {
    let t = spawn_app().await?;

    let (status, body) = send(&t.app, json_request("GET", "/admin/categories", None, None)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);

    let (status, _) = send(&t.app, json_request("GET", "/admin/categories", None, Some("not-a-jwt"))?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = json_request("POST", "/auth/login", Some(json!({"email": support::ADMIN_EMAIL, "password": "wrong-password"})), None)?;
    let (status, body) = send(&t.app, req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let token = login(&t.app).await?;
    let (status, body) = send(&t.app, json_request("GET", "/auth/me", None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], support::ADMIN_EMAIL);
    Ok(())
}

#[tokio::test]
async fn cookie_login_is_accepted() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let req = json_request("POST", "/auth/login", Some(json!({"email": support::ADMIN_EMAIL, "password": support::ADMIN_PASSWORD})), None)?;
    let resp = tower::ServiceExt::oneshot(t.app.clone(), req).await?;
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .expect("set-cookie");
    assert!(cookie.starts_with("auth_token="));

    let req = Request::builder().uri("/admin/banners").header(header::COOKIE, cookie).body(Body::empty())?;
    let (status, body) = send(&t.app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn catalog_changes_reach_storefront() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;

    let cat = admin_post(&t.app, &token, "/admin/categories", json!({"name": "Home Services"})).await?;
    let sub = admin_post(&t.app, &token, "/admin/subcategories", json!({"category_id": cat["id"], "name": "Cleaning"})).await?;
    let svc = admin_post(&t.app, &token, "/admin/services", json!({"subcategory_id": sub["id"], "name": "Deep Clean", "price_cents": 4500})).await?;
    admin_post(&t.app, &token, "/admin/carousel", json!({"subcategory_id": sub["id"], "position": "middle", "image_url": "/media/x.png"})).await?;
    admin_post(&t.app, &token, "/admin/homepage-sections", json!({"subcategory_id": sub["id"], "title": "Popular", "service_ids": [svc["id"]]})).await?;

    let (status, body) = send(&t.app, json_request("GET", "/api/storefront/categories/home-services", None, None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let first = &body["data"]["subcategories"][0];
    assert_eq!(first["slug"], "cleaning");
    assert_eq!(first["carousel"]["middle"][0]["image_url"], "/media/x.png");
    assert_eq!(first["services"][0]["name"], "Deep Clean");

    let (_, home) = send(&t.app, json_request("GET", "/api/storefront/homepage", None, None)?).await?;
    assert_eq!(home["data"][0]["services"][0]["slug"], "deep-clean");

    // a rename must not be hidden by the cache
    admin_post(&t.app, &token, "/admin/services", json!({"id": svc["id"], "subcategory_id": sub["id"], "name": "Deep Clean Plus", "slug": "deep-clean", "price_cents": 5000})).await?;
    let (_, home) = send(&t.app, json_request("GET", "/api/storefront/homepage", None, None)?).await?;
    assert_eq!(home["data"][0]["services"][0]["name"], "Deep Clean Plus");

    let uri = format!("/admin/categories/{}", cat["id"].as_str().unwrap_or_default());
    let (status, _) = send(&t.app, json_request("DELETE", &uri, None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&t.app, json_request("GET", "/api/storefront/categories/home-services", None, None)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn validation_and_conflicts_map_to_status_codes() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;

    admin_post(&t.app, &token, "/admin/products", json!({"name": "Kettle", "price_cents": 3000, "stock": 4})).await?;
    let (status, body) = send(&t.app, json_request("POST", "/admin/products", Some(json!({"name": "Kettle", "price_cents": 100})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);

    let (status, _) = send(&t.app, json_request("POST", "/admin/products", Some(json!({"name": "Broken", "price_cents": -5})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&t.app, json_request("POST", "/admin/categories", Some(json!({"name": "Bad", "slug": "Not A Slug"})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&t.app, json_request("GET", "/admin/products?search=kett", None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 1);
    Ok(())
}

fn png_upload(token: &str) -> anyhow::Result<Request<Body>> {
    let boundary = "XBOUNDARYX";
    let mut payload = Vec::new();
    payload.extend_from_slice(format!("--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\n").as_bytes());
    payload.extend_from_slice(&[0x89, b'P', b'N', b'G', 1, 2, 3]);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    Ok(Request::builder()
        .method("POST")
        .uri("/admin/media")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(payload))?)
}

/// Uploads a small PNG and returns `(key, url)`.
async fn upload(app: &axum::Router, token: &str) -> anyhow::Result<(String, String)> {
    let (status, body) = send(app, png_upload(token)?).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let key = body["data"]["key"].as_str().unwrap_or_default().to_string();
    let url = body["data"]["url"].as_str().unwrap_or_default().to_string();
    Ok((key, url))
}

#[tokio::test]
async fn media_upload_and_delete() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;

    let (key, url) = upload(&t.app, &token).await?;
    assert!(url.starts_with("/media/"));

    let (status, _) = send(&t.app, json_request("DELETE", &format!("/admin/media/{key}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, json_request("DELETE", &format!("/admin/media/{key}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn banner_images_are_released() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;

    let (first_key, first_url) = upload(&t.app, &token).await?;
    let banner = admin_post(&t.app, &token, "/admin/banners", json!({"title": "Eid Sale", "image_url": first_url})).await?;

    // swapping the image drops the old file
    let (second_key, second_url) = upload(&t.app, &token).await?;
    admin_post(&t.app, &token, "/admin/banners", json!({"id": banner["id"], "title": "Eid Sale", "image_url": second_url})).await?;
    let (status, _) = send(&t.app, json_request("DELETE", &format!("/admin/media/{first_key}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/banners", None, None)?).await?;
    assert_eq!(body["data"][0]["image_url"], second_url);

    let uri = format!("/admin/banners/{}", banner["id"].as_str().unwrap_or_default());
    let (status, _) = send(&t.app, json_request("DELETE", &uri, None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, json_request("DELETE", &format!("/admin/media/{second_key}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/banners", None, None)?).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn carousel_reorder_route() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;
    let cat = admin_post(&t.app, &token, "/admin/categories", json!({"name": "Home"})).await?;
    let sub = admin_post(&t.app, &token, "/admin/subcategories", json!({"category_id": cat["id"], "name": "Cleaning"})).await?;
    let mut ids = Vec::new();
    for n in 1..=3 {
        let img = admin_post(&t.app, &token, "/admin/carousel", json!({"subcategory_id": sub["id"], "position": "left", "image_url": format!("/media/{n}.png")})).await?;
        ids.push(img["id"].clone());
    }

    // warm the storefront cache before reordering
    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/subcategories/cleaning", None, None)?).await?;
    assert_eq!(body["data"]["carousel"]["left"][0]["image_url"], "/media/1.png");

    let reversed: Vec<Value> = ids.iter().rev().cloned().collect();
    let (status, body) = send(&t.app, json_request("POST", "/admin/carousel/reorder", Some(json!({"subcategory_id": sub["id"], "position": "left", "ordered_ids": reversed})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/subcategories/cleaning", None, None)?).await?;
    let order: Vec<&str> = body["data"]["carousel"]["left"]
        .as_array()
        .map(|a| a.iter().filter_map(|i| i["image_url"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(order, vec!["/media/3.png", "/media/2.png", "/media/1.png"]);

    // a partial id list is rejected
    let partial = vec![ids[0].clone()];
    let (status, _) = send(&t.app, json_request("POST", "/admin/carousel/reorder", Some(json!({"subcategory_id": sub["id"], "position": "left", "ordered_ids": partial})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
