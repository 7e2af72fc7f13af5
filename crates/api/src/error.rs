//! Error-path half of the envelope contract.
//!
//! Every error is rewritten into `{ data, status: "error", action_code }`
//! at this boundary; no raw framework or database error ever reaches the
//! client. 401 responses carry the dedicated re-auth action code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use plinth_core::envelope::{action_code_for_error, Envelope};
use plinth_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and classifies sqlx errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `plinth_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, data) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    serde_json::to_value(errors).unwrap_or_else(|_| json!({})),
                ),
                CoreError::NotFound { entity } => (
                    StatusCode::NOT_FOUND,
                    json!({ "detail": format!("{entity} not found.") }),
                ),
                CoreError::Gone { entity } => (
                    StatusCode::GONE,
                    json!({ "detail": format!("The requested {entity} has expired.") }),
                ),
                CoreError::MethodNotAllowed => (
                    StatusCode::METHOD_NOT_ALLOWED,
                    json!({ "detail": "Method not allowed." }),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, json!({ "detail": msg }))
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "detail": msg })),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "detail": msg })),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "detail": "An internal error occurred." }),
                    )
                }
            },
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let envelope = Envelope::<Value>::new(
            Some(data),
            status.as_u16(),
            action_code_for_error(status.as_u16()),
        );
        (status, Json(envelope)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and an envelope payload.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            json!({ "detail": "Resource not found." }),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        json!({
                            "detail":
                                format!("Duplicate value violates unique constraint: {constraint}.")
                        }),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": "An internal error occurred." }),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": "An internal error occurred." }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use plinth_core::envelope::{ACTION_DISPLAY_ERROR, ACTION_REAUTHENTICATE};

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_surface_per_field() {
        let err = AppError::Core(CoreError::field("name", "This field may not be blank."));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["action_code"], ACTION_DISPLAY_ERROR);
        assert_eq!(json["data"]["name"][0], "This field may not be blank.");
    }

    #[tokio::test]
    async fn unauthorized_carries_reauth_action_code() {
        let err = AppError::Core(CoreError::Unauthorized("No token.".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["action_code"], ACTION_REAUTHENTICATE);
    }

    #[tokio::test]
    async fn gone_is_distinct_from_not_found() {
        let gone = AppError::Core(CoreError::Gone { entity: "City" }).into_response();
        let missing = AppError::Core(CoreError::NotFound { entity: "City" }).into_response();
        assert_eq!(gone.status(), StatusCode::GONE);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn method_not_allowed_is_enveloped() {
        let response = AppError::Core(CoreError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["data"]["detail"], "Method not allowed.");
    }
}
