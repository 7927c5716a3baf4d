//! Session middleware for protected routes.
//!
//! The session token travels in an HTTP-only cookie; a `Bearer` header is
//! accepted as well for non-browser clients. A verified token is resolved to
//! the stored principal, which handlers read through [`CurrentPrincipal`].

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use coffer_core::accounts::{AccountError, Principal};
use coffer_shared::AppError;

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Builds the HTTP-only session cookie carrying `token`.
pub fn session_cookie(name: &str, token: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn session_token(state: &AppState, request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(&state.cookie_name) {
        return Some(cookie.value().to_string());
    }
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string)
}

/// Verifies the session and attaches the principal to the request.
///
/// Missing, expired, or tampered tokens, and tokens naming a principal that
/// no longer exists, are rejected with 401.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(&state, &request) else {
        return ApiError(AppError::Unauthorized("Authentication required".into()))
            .into_response();
    };

    let claims = match state.sessions.verify(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "session rejected");
            return ApiError::from(err).into_response();
        }
    };

    let principal = match state.core.accounts.find(claims.principal.id).await {
        Ok(principal) => principal,
        Err(AccountError::NotFound) => {
            tracing::warn!(user_id = %claims.principal.id, "session for unknown principal");
            return ApiError(AppError::Unauthorized("Invalid session".into())).into_response();
        }
        Err(err) => return ApiError::from(err).into_response(),
    };

    request.extensions_mut().insert(CurrentPrincipal(principal));
    next.run(request).await
}

/// The authenticated principal for this request.
///
/// Only available behind [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".into())))
    }
}
