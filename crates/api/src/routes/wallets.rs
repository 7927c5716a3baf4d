//! Wallet routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use coffer_core::workflow::{Wallet, WalletDraft, WalletOverview};
use coffer_shared::types::{OrganizationId, WalletId};

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::CurrentPrincipal,
};

/// Creates the wallets router (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/wallets", post(create_wallet))
        .route(
            "/organizations/{org_id}/wallets/{wallet_id}",
            get(view_wallet).delete(delete_wallet),
        )
}

/// Where the client lands after a wallet is deleted.
pub fn organization_location(org_id: OrganizationId) -> String {
    format!("/dashboard/organizations/{org_id}")
}

/// Query parameters for the wallet view.
#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    /// 1-indexed page of transactions.
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// POST /organizations/{org_id}/wallets - Open a wallet.
async fn create_wallet(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(org_id): Path<OrganizationId>,
    WithRejection(Json(draft), _): JsonBody<WalletDraft>,
) -> Result<(StatusCode, Json<Wallet>), ApiError> {
    let wallet = state
        .core
        .workflow
        .create_wallet(&principal, org_id, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(wallet)))
}

/// GET /organizations/{org_id}/wallets/{wallet_id}?page= - Wallet with recent transactions.
async fn view_wallet(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((org_id, wallet_id)): Path<(OrganizationId, WalletId)>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<WalletOverview>, ApiError> {
    let overview = state
        .core
        .workflow
        .wallet_overview(&principal, org_id, wallet_id, query.page)
        .await?;
    Ok(Json(overview))
}

/// DELETE /organizations/{org_id}/wallets/{wallet_id} - Delete, then redirect
/// to the organization.
async fn delete_wallet(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((org_id, wallet_id)): Path<(OrganizationId, WalletId)>,
) -> Result<Redirect, ApiError> {
    state
        .core
        .workflow
        .delete_wallet(&principal, org_id, wallet_id)
        .await?;
    Ok(Redirect::to(&organization_location(org_id)))
}
