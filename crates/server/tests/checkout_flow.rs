mod support;

use axum::http::{header, StatusCode};
use serde_json::{json, Value};

use service::payment::mock::MockGateway;
use support::{admin_post, form_request, json_request, login, send, spawn_app, spawn_app_with, TestApp};

async fn seed_product(t: &TestApp, token: &str, stock: i32) -> anyhow::Result<Value> {
    admin_post(&t.app, token, "/admin/products", json!({"name": "Rice Cooker", "price_cents": 2500, "stock": stock})).await
}

fn checkout_body(product_id: &Value, quantity: i32, method: &str) -> Value {
    json!({
        "customer_name": "Rahim",
        "customer_phone": "+8801711000000",
        "shipping_address": "House 1, Road 2, Dhaka",
        "payment_method": method,
        "items": [{"product_id": product_id, "quantity": quantity}],
    })
}

#[tokio::test]
async fn cash_on_delivery_order_is_settled_and_decrements_stock() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;
    let product = seed_product(&t, &token, 3).await?;

    let (status, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 2, "cod")), None)?).await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["total_cents"], 5000);
    assert!(body["data"].get("redirect_url").map_or(true, Value::is_null));
    let order_id = body["data"]["order_id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&t.app, json_request("GET", &format!("/api/orders/{order_id}/status"), None, None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["settled"], true);
    assert_eq!(body["data"]["status"], "pending");

    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/products/rice-cooker", None, None)?).await?;
    assert_eq!(body["data"]["stock"], 1);

    // only one unit left
    let (status, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 2, "cod")), None)?).await?;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    Ok(())
}

#[tokio::test]
async fn online_payment_round_trip() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;
    let product = seed_product(&t, &token, 5).await?;

    let (status, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 1, "sslcommerz")), None)?).await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let data = &body["data"];
    let order_id = data["order_id"].as_str().unwrap_or_default().to_string();
    let tran_id = data["transaction_id"].as_str().unwrap_or_default().to_string();
    assert_eq!(data["redirect_url"], format!("https://gateway.test/pay/{tran_id}"));
    assert_eq!(t.gateway.sessions().len(), 1);

    let (_, body) = send(&t.app, json_request("GET", &format!("/api/orders/{order_id}/status"), None, None)?).await?;
    assert_eq!(body["data"]["settled"], false);
    assert!(body["data"]["poll_after_ms"].is_u64());

    t.gateway.approve("VAL-1", &tran_id, 2500);
    let form = format!("tran_id={tran_id}&val_id=VAL-1&status=VALID&amount=25.00");
    let resp = tower::ServiceExt::oneshot(t.app.clone(), form_request("/api/payment/sslcommerz/success", &form)?).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(location.contains(&format!("order_id={order_id}")), "{location}");
    assert!(location.contains("payment_status=paid"), "{location}");

    let (_, body) = send(&t.app, json_request("GET", &format!("/api/orders/{order_id}/status"), None, None)?).await?;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["settled"], true);

    // the gateway may notify again; nothing changes
    let (status, body) = send(&t.app, form_request("/api/payment/sslcommerz/ipn", &form)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], false);
    assert_eq!(body["data"]["payment_status"], "paid");

    // a late failure must not undo a verified payment
    let fail = format!("tran_id={tran_id}&status=FAILED");
    let (status, body) = send(&t.app, form_request("/api/payment/sslcommerz/ipn", &fail)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["payment_status"], "paid");
    Ok(())
}

#[tokio::test]
async fn cancelled_payment_and_unknown_transaction() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;
    let product = seed_product(&t, &token, 5).await?;

    let (_, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 1, "sslcommerz")), None)?).await?;
    let tran_id = body["data"]["transaction_id"].as_str().unwrap_or_default().to_string();

    let resp = tower::ServiceExt::oneshot(t.app.clone(), form_request("/api/payment/sslcommerz/cancel", &format!("tran_id={tran_id}&status=CANCELLED"))?).await?;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(location.starts_with("/checkout/result?"), "{location}");
    assert!(location.contains("payment_status=cancelled"));

    let (status, _) = send(&t.app, form_request("/api/payment/sslcommerz/ipn", "tran_id=TXN-UNKNOWN&status=VALID")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_order_lifecycle() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let token = login(&t.app).await?;
    let product = seed_product(&t, &token, 5).await?;
    let (_, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 1, "cod")), None)?).await?;
    let order_id = body["data"]["order_id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&t.app, json_request("GET", "/admin/orders?status=pending", None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 1);

    let (status, _) = send(&t.app, json_request("GET", "/admin/orders?status=lost", None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&t.app, json_request("GET", &format!("/admin/orders/{order_id}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));

    let uri = format!("/admin/orders/{order_id}/status");
    let (status, body) = send(&t.app, json_request("PUT", &uri, Some(json!({"status": "delivered"})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "delivered");

    let (status, body) = send(&t.app, json_request("PUT", &uri, Some(json!({"status": "processing"})), Some(&token))?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(&t.app, json_request("DELETE", &format!("/admin/orders/{order_id}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, json_request("GET", &format!("/admin/orders/{order_id}"), None, Some(&token))?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn failed_gateway_session_still_refreshes_product_cache() -> anyhow::Result<()> {
    let t = spawn_app_with(MockGateway::failing()).await?;
    let token = login(&t.app).await?;
    let product = seed_product(&t, &token, 3).await?;

    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/products/rice-cooker", None, None)?).await?;
    assert_eq!(body["data"]["stock"], 3);

    let (status, body) = send(&t.app, json_request("POST", "/api/checkout", Some(checkout_body(&product["id"], 2, "sslcommerz")), None)?).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY, "{body}");

    // the order was committed before the gateway call, so the reserved units are gone
    let (_, body) = send(&t.app, json_request("GET", "/api/storefront/products/rice-cooker", None, None)?).await?;
    assert_eq!(body["data"]["stock"], 1);
    Ok(())
}
