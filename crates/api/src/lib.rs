//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Session middleware and the current-principal extractor
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use coffer_core::CoreContext;
use coffer_shared::SessionTokenService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Services wired over the process's repositories and policy engine.
    pub core: Arc<CoreContext>,
    /// Issues and verifies session tokens.
    pub sessions: Arc<SessionTokenService>,
    /// Name of the session cookie.
    pub cookie_name: Arc<str>,
}

impl AppState {
    /// Bundles the process-scoped services.
    #[must_use]
    pub fn new(core: CoreContext, sessions: SessionTokenService, cookie_name: &str) -> Self {
        Self {
            core: Arc::new(core),
            sessions: Arc::new(sessions),
            cookie_name: Arc::from(cookie_name),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
