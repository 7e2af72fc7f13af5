//! Bearer-token authentication extractor.
//!
//! Tokens are opaque strings looked up against the users table; there is
//! no session machinery here. A missing or invalid token maps to 401,
//! which the envelope layer translates into the re-auth action code.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rand::distr::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

use plinth_core::error::CoreError;
use plinth_core::types::DbId;
use plinth_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Length of generated API tokens.
pub const API_TOKEN_LENGTH: usize = 40;

/// Generate an opaque alphanumeric API token.
pub fn generate_api_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(API_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; mutating operations also use it to stamp the acting
/// user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Internal database id, used for actor stamps.
    pub id: DbId,
    /// External identifier.
    pub uuid: Uuid,
    /// Email, used in trace entries.
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header.".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>.".into(),
            ))
        })?;

        let user = UserRepo::find_by_api_token(&state.pool, token)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token.".into()))
            })?;

        Ok(CurrentUser {
            id: user.id,
            uuid: user.uuid,
            email: user.email,
        })
    }
}
