//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::require_session};

pub mod auth;
pub mod health;
pub mod organizations;
pub mod transactions;
pub mod wallets;

/// Creates the API router: public routes plus the session-protected ones.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(organizations::routes())
        .merge(wallets::routes())
        .merge(transactions::routes())
        .layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
