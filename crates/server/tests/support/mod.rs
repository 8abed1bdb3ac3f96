#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::Value;
use server::ServerState;
use service::auth::repo::seaorm::SeaOrmAdminRepository;
use service::auth::{AuthService, AuthSettings};
use service::cache::StorefrontCache;
use service::media::LocalMediaStore;
use service::payment::mock::MockGateway;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const ADMIN_PASSWORD: &str = "S3curePass!";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub gateway: Arc<MockGateway>,
}

pub async fn spawn_app() -> anyhow::Result<TestApp> {
    spawn_app_with(MockGateway::new()).await
}

pub async fn spawn_app_with(gateway: MockGateway) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;

    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "integration-test-secret".into();
    cfg.media.root = std::env::temp_dir().join(format!("storefront-it-{}", Uuid::new_v4())).to_string_lossy().into_owned();

    let auth = Arc::new(AuthService::new(Arc::new(SeaOrmAdminRepository { db: db.clone() }), AuthSettings::from(&cfg.auth)));
    auth.create_admin(ADMIN_EMAIL, "Admin", ADMIN_PASSWORD).await?;
    let gateway = Arc::new(gateway);
    let state = ServerState {
        db,
        auth,
        cache: StorefrontCache::from_config(&cfg.cache),
        media: Arc::new(LocalMediaStore::from_config(&cfg.media)),
        gateway: Some(gateway.clone()),
        config: Arc::new(cfg),
    };
    let app = server::startup::build_app(state.clone());
    Ok(TestApp { app, state, gateway })
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, body))
}

pub fn json_request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => builder.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(req)
}

pub fn form_request(uri: &str, form: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))?)
}

pub async fn login(app: &Router) -> anyhow::Result<String> {
    let req = json_request("POST", "/auth/login", Some(serde_json::json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})), None)?;
    let (status, body) = send(app, req).await?;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
}

/// POSTs to an admin upsert route and returns `data`.
pub async fn admin_post(app: &Router, token: &str, uri: &str, body: Value) -> anyhow::Result<Value> {
    let (status, resp) = send(app, json_request("POST", uri, Some(body), Some(token))?).await?;
    assert_eq!(status, StatusCode::OK, "POST {uri} failed: {resp}");
    Ok(resp["data"].clone())
}
