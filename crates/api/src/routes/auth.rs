//! Authentication routes: register, login, logout, and the current session.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::{
    WithRejection,
    cookie::{Cookie, CookieJar},
};

use coffer_core::accounts::{Principal, PrincipalSummary};
use coffer_shared::auth::{LoginRequest, RegisterRequest};

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::{CurrentPrincipal, session_cookie},
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Routes that need an established session.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/session", get(current_session))
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    principal: &Principal,
) -> Result<CookieJar, ApiError> {
    let token = state.sessions.issue(principal.claims())?;
    Ok(jar.add(session_cookie(&state.cookie_name, token)))
}

/// POST /auth/register - Create a principal and start its session.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state.core.accounts.register(payload).await?;
    let jar = start_session(&state, jar, &principal)?;
    Ok((StatusCode::NO_CONTENT, jar))
}

/// POST /auth/login - Check credentials and start a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state.core.accounts.authenticate(payload).await?;
    let jar = start_session(&state, jar, &principal)?;
    Ok((StatusCode::NO_CONTENT, jar))
}

/// POST /auth/logout - Clear the session cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let cookie = Cookie::build((state.cookie_name.to_string(), "")).path("/");
    (StatusCode::NO_CONTENT, jar.remove(cookie))
}

/// GET /auth/session - The signed-in principal.
async fn current_session(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalSummary> {
    Json(principal.summary())
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use serde_json::json;

    use crate::test_support::{
        COOKIE, app, body_json, empty_request, json_request, send, signed_in, state,
    };

    fn registration(email: &str) -> serde_json::Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": "analytical-engine",
        })
    }

    #[tokio::test]
    async fn test_register_sets_http_only_cookie_and_no_body() {
        let state = state().await;

        let response = send(
            app(&state),
            json_request("POST", "/api/v1/auth/register", None, &registration("ada@example.com")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with(&format!("{COOKIE}=")));
        assert!(cookie.contains("HttpOnly"));

        let token = cookie
            .trim_start_matches(&format!("{COOKIE}="))
            .split(';')
            .next()
            .unwrap();
        let claims = state.sessions.verify(token).unwrap();
        assert_eq!(claims.principal.email, "ada@example.com");
        assert_eq!(claims.principal.first_name, "Ada");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let state = state().await;
        let body = registration("dup@example.com");

        send(app(&state), json_request("POST", "/api/v1/auth/register", None, &body)).await;
        let response = send(
            app(&state),
            json_request("POST", "/api/v1/auth/register", None, &body),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_returns_field_map() {
        let state = state().await;

        let response = send(
            app(&state),
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                &json!({ "firstName": "", "lastName": "X", "email": "nope", "password": "" }),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["fields"]["firstName"], "First name is required");
        assert_eq!(body["fields"]["email"], "Invalid email");
        assert_eq!(body["fields"]["password"], "Password is required");
        assert!(body["fields"].get("lastName").is_none());
    }

    #[tokio::test]
    async fn test_login_and_wrong_password() {
        let state = state().await;
        send(
            app(&state),
            json_request("POST", "/api/v1/auth/register", None, &registration("bo@example.com")),
        )
        .await;

        let ok = send(
            app(&state),
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                &json!({ "email": "bo@example.com", "password": "analytical-engine" }),
            ),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
        assert!(ok.headers().contains_key(header::SET_COOKIE));

        let bad = send(
            app(&state),
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                &json!({ "email": "bo@example.com", "password": "wrong" }),
            ),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_requires_valid_cookie() {
        let state = state().await;
        let (principal, cookie) = signed_in(&state, "carol").await;

        let missing = send(app(&state), empty_request("GET", "/api/v1/auth/session", None)).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let tampered = format!("{cookie}x");
        let rejected = send(
            app(&state),
            empty_request("GET", "/api/v1/auth/session", Some(&tampered)),
        )
        .await;
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            app(&state),
            empty_request("GET", "/api/v1/auth/session", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "carol");
        assert_eq!(body["id"], principal.id.to_string());
        assert!(body.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let state = state().await;

        let (_, cookie) = signed_in(&state, "dave").await;

        let response = send(
            app(&state),
            empty_request("POST", "/api/v1/auth/logout", Some(&cookie)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with(&format!("{COOKIE}=")));
        assert!(cookie.contains("Max-Age=0"));
    }
}
