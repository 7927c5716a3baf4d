//! Error-to-response mapping.
//!
//! Every handler returns `Result<_, ApiError>`. Core errors are folded into
//! the shared [`AppError`] taxonomy here and rendered as
//! `{"error": CODE, "message": ..., "fields": {...}}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde::Serialize;

use coffer_core::accounts::AccountError;
use coffer_core::authorization::AuthorizationError;
use coffer_core::organization::OrganizationError;
use coffer_core::workflow::WorkflowError;
use coffer_shared::{AppError, FieldErrors, JwtError};

/// JSON body extractor whose rejections render as a field map.
pub type JsonBody<T> = WithRejection<Json<T>, ApiError>;

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
            "An internal error occurred".to_string()
        } else {
            match &err {
                AppError::Unauthorized(msg)
                | AppError::Forbidden(msg)
                | AppError::NotFound(msg)
                | AppError::Conflict(msg) => msg.clone(),
                AppError::Validation(_) => "Invalid input".to_string(),
                AppError::Database(_) | AppError::Internal(_) => err.to_string(),
            }
        };

        let body = ErrorBody {
            error: err.error_code(),
            message,
            fields: err.field_errors(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "request body rejected");
        Self(AppError::field("body", &rejection.body_text()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingError(msg) => Self(AppError::Internal(msg)),
            JwtError::Expired => Self(AppError::Unauthorized("Session has expired".into())),
            JwtError::WrongIssuer | JwtError::Invalid => {
                Self(AppError::Unauthorized("Invalid session".into()))
            }
        }
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        Self(AppError::Forbidden(err.to_string()))
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let app = match err {
            AccountError::Validation(fields) => AppError::Validation(fields),
            AccountError::EmailTaken | AccountError::UsernameTaken => {
                AppError::Conflict(err.to_string())
            }
            AccountError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            AccountError::NotFound => AppError::NotFound(err.to_string()),
            AccountError::Password(_) => AppError::Internal(err.to_string()),
            AccountError::Store(_) => AppError::Database(err.to_string()),
        };
        Self(app)
    }
}

impl From<OrganizationError> for ApiError {
    fn from(err: OrganizationError) -> Self {
        let app = match err {
            OrganizationError::Validation(fields) => AppError::Validation(fields),
            OrganizationError::Unauthorized(inner) => return inner.into(),
            OrganizationError::NotFound | OrganizationError::UserNotFound => {
                AppError::NotFound(err.to_string())
            }
            OrganizationError::UnknownRole(_) | OrganizationError::LastOwner => {
                AppError::field("role", &err.to_string())
            }
            OrganizationError::Policy(_) => AppError::Internal(err.to_string()),
            OrganizationError::Store(_) => AppError::Database(err.to_string()),
        };
        Self(app)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        if let Some(fields) = err.field_errors() {
            return Self(AppError::Validation(fields));
        }
        let app = match err {
            WorkflowError::Unauthorized(inner) => return inner.into(),
            WorkflowError::Account(inner) => return inner.into(),
            WorkflowError::WalletNotFound | WorkflowError::OrganizationNotFound => {
                AppError::NotFound(err.to_string())
            }
            WorkflowError::Store(_) => AppError::Database(err.to_string()),
            WorkflowError::Validation(fields) => AppError::Validation(fields),
            WorkflowError::InsufficientBalance
            | WorkflowError::BalanceLimit
            | WorkflowError::ReviewerNotAuthorized => {
                AppError::Validation(FieldErrors::new())
            }
        };
        Self(app)
    }
}
