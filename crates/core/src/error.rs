//! Domain error taxonomy.
//!
//! Every error that can reach a client is one of these variants; the API
//! layer maps them onto HTTP status codes and rewrites them into the
//! response envelope. Validation failures always carry per-field messages,
//! never a single opaque string.

use std::collections::BTreeMap;

/// Per-field validation messages, keyed by field name.
///
/// Errors that cannot be attributed to a single field go under
/// [`NON_FIELD_ERRORS`].
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Key used for validation messages not tied to a specific field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Domain-level error shared across the workspace.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    /// Input failed validation. Maps to 400.
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// The entity does not exist (or the external identifier never matched).
    /// Maps to 404.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The entity existed but has been retired (soft-deleted). Maps to 410,
    /// kept distinct from 404 so clients can tell "never existed" from
    /// "existed and was retired".
    #[error("{entity} is no longer available")]
    Gone { entity: &'static str },

    /// The operation is not declared for this resource. Maps to 405.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Missing or invalid credentials. Maps to 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted. Maps to 403.
    #[error("{0}")]
    Forbidden(String),

    /// A uniqueness or state conflict the client can resolve. Maps to 409.
    #[error("{0}")]
    Conflict(String),

    /// Anything the client cannot act on. Maps to a sanitized 500.
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    /// A validation error attributed to a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        CoreError::Validation(errors)
    }

    /// A validation error not tied to any particular field.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::field(NON_FIELD_ERRORS, message)
    }
}
