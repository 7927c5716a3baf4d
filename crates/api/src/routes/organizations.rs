//! Organization management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use coffer_core::organization::{Organization, OrganizationView};
use coffer_shared::types::{OrganizationId, UserId};

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::CurrentPrincipal,
};

/// Creates the organizations router (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations/{org_id}", get(view_organization))
        .route("/organizations/{org_id}/members", post(grant_role))
        .route(
            "/organizations/{org_id}/members/{user_id}/roles/{role}",
            delete(revoke_role),
        )
}

/// Body of an organization creation request.
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Body of a role grant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRoleRequest {
    /// Principal receiving the role.
    pub user_id: UserId,
    /// Built-in role name.
    pub role: String,
}

#[derive(Serialize)]
struct GrantResponse {
    granted: bool,
}

/// POST /organizations - Create an organization owned by the caller.
async fn create_organization(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    WithRejection(Json(payload), _): JsonBody<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let org = state
        .core
        .organizations
        .create_organization(principal.id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(org)))
}

/// GET /organizations/{org_id} - The organization and the caller's role.
async fn view_organization(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(org_id): Path<OrganizationId>,
) -> Result<Json<OrganizationView>, ApiError> {
    let view = state
        .core
        .organizations
        .view_organization(principal.id, org_id)
        .await?;
    Ok(Json(view))
}

/// POST /organizations/{org_id}/members - Grant a role.
async fn grant_role(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(org_id): Path<OrganizationId>,
    WithRejection(Json(payload), _): JsonBody<GrantRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let granted = state
        .core
        .organizations
        .grant_role(principal.id, org_id, payload.user_id, &payload.role)
        .await?;
    Ok(Json(GrantResponse { granted }))
}

/// DELETE /organizations/{org_id}/members/{user_id}/roles/{role} - Revoke a role.
async fn revoke_role(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((org_id, user_id, role)): Path<(OrganizationId, UserId, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .core
        .organizations
        .revoke_role(principal.id, org_id, user_id, &role)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
