//! City entity model and DTOs.
//!
//! Cities are soft-deletable unique-name entities: destroy never removes
//! the row, it flips `is_deleted` and stamps `deleted_at` / `deleted_by`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use plinth_core::types::{DbId, Timestamp};

/// A city row from the `cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub uuid: Uuid,
    pub name: String,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub deleted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

/// DTO for creating a city.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCity {
    #[validate(length(min = 1, max = 512, message = "This field may not be blank."))]
    pub name: String,
}

/// DTO for updating a city. All fields optional; only non-`None` fields
/// are applied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCity {
    #[validate(length(min = 1, max = 512, message = "This field may not be blank."))]
    pub name: Option<String>,
}
