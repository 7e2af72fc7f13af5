//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use plinth_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
///
/// The API token is a credential; it is read for authentication but never
/// serialized into responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub uuid: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

/// DTO for creating a user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, max = 512, message = "This field may not be blank."))]
    pub display_name: String,
}

/// DTO for updating a user. All fields optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 512, message = "This field may not be blank."))]
    pub display_name: Option<String>,
    pub is_active: Option<bool>,
}
