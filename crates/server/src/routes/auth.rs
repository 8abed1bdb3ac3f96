use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::types::ActionOk;
use serde::Serialize;
use service::auth::domain::{AdminClaims, AdminUser, LoginInput};
use tracing::warn;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Serialize)]
pub struct LoginOutput {
    pub admin: AdminUser,
    pub token: String,
    pub expires_at: i64,
}

#[derive(Serialize)]
pub struct MeOutput {
    pub admin_id: Uuid,
    pub email: String,
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<ActionOk<LoginOutput>>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.config.auth.cookie_secure);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput { admin: session.admin, token: session.token, expires_at: session.expires_at };
    Ok((jar.add(cookie), Json(ActionOk::new(out))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 200, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ActionOk<bool>>) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Json(ActionOk::new(true)))
}

pub async fn me(Extension(claims): Extension<AdminClaims>) -> Json<ActionOk<MeOutput>> {
    Json(ActionOk::new(MeOutput { admin_id: claims.uid, email: claims.sub }))
}

fn token_from_request(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("expected a Bearer token".into()))),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

/// Admin guard: missing token is 400, an invalid or expired one is 401.
/// Verified claims are attached to the request for downstream handlers.
pub async fn require_admin(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();
    let Some(token) = token_from_request(&req)? else {
        warn!(path = %path, "missing Authorization header and auth_token cookie");
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Missing Token", Some("admin token required".into())));
    };
    let claims = state.auth.verify_token(&token).map_err(|e| {
        warn!(path = %path, "token validation failed");
        JsonApiError::from(e)
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
