//! Router fixtures over the in-memory store.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use fake::{
    Fake,
    faker::{
        internet::en::SafeEmail,
        name::en::{FirstName, LastName},
    },
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use coffer_core::CoreContext;
use coffer_core::accounts::Principal;
use coffer_shared::auth::RegisterRequest;
use coffer_shared::config::WorkflowConfig;
use coffer_shared::{SessionConfig, SessionTokenService};

use crate::{AppState, create_router};

pub const COOKIE: &str = "coffer_session";

pub async fn state() -> AppState {
    let core = CoreContext::in_memory(WorkflowConfig::default())
        .await
        .expect("in-memory context");
    let sessions = SessionTokenService::new(&SessionConfig {
        secret: "test-secret".to_string(),
        issuer: "coffer".to_string(),
        expiration_secs: 3600,
        cookie_name: COOKIE.to_string(),
    });
    AppState::new(core, sessions, COOKIE)
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

/// Registers a principal with a fake profile and returns it with a cookie
/// header value for its session.
pub async fn signed_in(state: &AppState, username: &str) -> (Principal, String) {
    let principal = state
        .core
        .accounts
        .register(RegisterRequest {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            email: format!("{username}.{}", SafeEmail().fake::<String>()),
            password: "correct horse battery staple".to_string(),
            username: Some(username.to_string()),
        })
        .await
        .expect("register");
    let token = state.sessions.issue(principal.claims()).expect("issue");
    (principal, format!("{COOKIE}={token}"))
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
