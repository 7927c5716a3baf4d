//! Transaction creation route.
//!
//! One endpoint serves two actions selected by the `action` field:
//! `user-search` looks up candidate reviewers, `create-transaction` runs the
//! full creation pipeline and redirects to the new transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use coffer_core::accounts::PrincipalSummary;
use coffer_core::workflow::TransactionDraft;
use coffer_shared::types::{OrganizationId, TransactionId, WalletId};

use crate::{
    AppState,
    error::{ApiError, JsonBody},
    middleware::CurrentPrincipal,
};

/// Creates the transactions router (requires the session middleware).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/organizations/{org_id}/wallets/{wallet_id}/transactions",
        post(transaction_action),
    )
}

/// Where the client lands after a transaction is created.
pub fn transaction_location(
    org_id: OrganizationId,
    wallet_id: WalletId,
    transaction_id: TransactionId,
) -> String {
    format!("/dashboard/organizations/{org_id}/wallets/{wallet_id}/transactions/{transaction_id}")
}

/// The two sub-actions of the transaction form.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TransactionAction {
    /// Find principals to pick a reviewer from.
    UserSearch {
        /// Free-text query over username, names, and email.
        #[serde(default, alias = "search")]
        query: String,
    },
    /// Record a transaction.
    CreateTransaction(TransactionDraft),
}

#[derive(Serialize)]
struct UserSearchResponse {
    users: Vec<PrincipalSummary>,
}

/// POST /organizations/{org_id}/wallets/{wallet_id}/transactions
async fn transaction_action(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path((org_id, wallet_id)): Path<(OrganizationId, WalletId)>,
    WithRejection(Json(action), _): JsonBody<TransactionAction>,
) -> Result<Response, ApiError> {
    match action {
        TransactionAction::UserSearch { query } => {
            let users = state
                .core
                .workflow
                .search_reviewers(&principal, org_id, &query)
                .await?;
            Ok(Json(UserSearchResponse { users }).into_response())
        }
        TransactionAction::CreateTransaction(draft) => {
            let record = state
                .core
                .workflow
                .create_transaction(&principal, org_id, wallet_id, &draft)
                .await?;
            let location = transaction_location(org_id, wallet_id, record.id);
            Ok(Redirect::to(&location).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use serde_json::json;

    use crate::test_support::{app, body_json, empty_request, json_request, send, signed_in, state};

    struct World {
        state: crate::AppState,
        org_id: String,
        wallet_id: String,
        creator: String,
        reviewer_name: String,
    }

    /// An organization with one wallet of `balance`, a member `creator`,
    /// and a `reviewer` holding the reviewer role.
    async fn world(balance: &str) -> World {
        let state = state().await;
        let (_, owner) = signed_in(&state, "owner").await;
        let (creator, creator_cookie) = signed_in(&state, "creator").await;
        let (reviewer, _) = signed_in(&state, "reviewer").await;

        let org = send(
            app(&state),
            json_request("POST", "/api/v1/organizations", Some(&owner), &json!({ "name": "Org 1" })),
        )
        .await;
        let org_id = body_json(org).await["id"].as_str().unwrap().to_string();

        for (user, role) in [(creator.id, "member"), (reviewer.id, "reviewer")] {
            let granted = send(
                app(&state),
                json_request(
                    "POST",
                    &format!("/api/v1/organizations/{org_id}/members"),
                    Some(&owner),
                    &json!({ "userId": user, "role": role }),
                ),
            )
            .await;
            assert_eq!(granted.status(), StatusCode::OK);
        }

        let wallet = send(
            app(&state),
            json_request(
                "POST",
                &format!("/api/v1/organizations/{org_id}/wallets"),
                Some(&owner),
                &json!({ "name": "W", "balance": balance }),
            ),
        )
        .await;
        let wallet_id = body_json(wallet).await["id"].as_str().unwrap().to_string();

        World {
            state,
            org_id,
            wallet_id,
            creator: creator_cookie,
            reviewer_name: reviewer.username,
        }
    }

    impl World {
        fn uri(&self) -> String {
            format!(
                "/api/v1/organizations/{}/wallets/{}/transactions",
                self.org_id, self.wallet_id
            )
        }

        async fn post(&self, body: &serde_json::Value) -> axum::http::Response<axum::body::Body> {
            send(
                app(&self.state),
                json_request("POST", &self.uri(), Some(&self.creator), body),
            )
            .await
        }

        fn spend(&self, value: &str, reviewer: &str) -> serde_json::Value {
            json!({
                "action": "create-transaction",
                "type": "out",
                "spendDateTime": chrono::Utc::now().timestamp_millis().to_string(),
                "transactionValue": value,
                "reviewer": reviewer,
                "notes": "office chairs",
            })
        }

        async fn overview(&self) -> serde_json::Value {
            let response = send(
                app(&self.state),
                empty_request(
                    "GET",
                    &format!(
                        "/api/v1/organizations/{}/wallets/{}",
                        self.org_id, self.wallet_id
                    ),
                    Some(&self.creator),
                ),
            )
            .await;
            body_json(response).await
        }
    }

    #[tokio::test]
    async fn test_create_transaction_redirects_to_detail_view() {
        let world = world("100.00").await;

        let response = world.post(&world.spend("50.00", &world.reviewer_name)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let prefix = format!(
            "/dashboard/organizations/{}/wallets/{}/transactions/",
            world.org_id, world.wallet_id
        );
        assert!(location.starts_with(&prefix));

        let overview = world.overview().await;
        assert_eq!(overview["wallet"]["balance"], "50.00");
        assert_eq!(overview["transactions"]["data"][0]["transactionValue"], "-50.00");
        assert_eq!(overview["transactions"]["data"][0]["approved"], false);
    }

    #[tokio::test]
    async fn test_self_review_is_field_error() {
        let world = world("100.00").await;

        let response = world.post(&world.spend("50.00", "creator")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["fields"]["reviewer"], "Reviewer cannot be yourself");
    }

    #[tokio::test]
    async fn test_overdraw_is_field_error_and_changes_nothing() {
        let world = world("10.00").await;

        let response = world.post(&world.spend("10.01", &world.reviewer_name)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["fields"]["transactionValue"],
            "The wallet does not have enough balance for this transaction."
        );
        let overview = world.overview().await;
        assert_eq!(overview["wallet"]["balance"], "10.00");
        assert_eq!(overview["transactions"]["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_reviewer_without_approval_is_field_error() {
        let world = world("100.00").await;

        let response = world.post(&world.spend("1.00", "owner")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        signed_in(&world.state, "outsider").await;
        let response = world.post(&world.spend("1.00", "outsider")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["fields"]["reviewer"],
            "User is not authorized to review your transaction"
        );
    }

    #[tokio::test]
    async fn test_user_search_excludes_requester() {
        let world = world("0").await;

        let response = world
            .post(&json!({ "action": "user-search", "query": "e" }))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let usernames: Vec<&str> = body["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert!(usernames.contains(&"reviewer"));
        assert!(!usernames.contains(&"creator"));
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() {
        let world = world("0").await;

        let response = world.post(&json!({ "action": "approve" })).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_numeric_transaction_value_is_json_field_error() {
        let world = world("100.00").await;
        let mut body = world.spend("50.00", &world.reviewer_name);
        body["transactionValue"] = json!(50);

        let response = world.post(&body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["fields"]["body"].as_str().unwrap().contains("expected a string"));
        assert_eq!(world.overview().await["transactions"]["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_user_search_accepts_search_field() {
        let world = world("0").await;

        let response = world
            .post(&json!({ "action": "user-search", "search": "review" }))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["users"][0]["username"], "reviewer");
    }
}
