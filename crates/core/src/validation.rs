//! Bridges `validator` derive output into the per-field error contract.

use validator::Validate;

use crate::error::{CoreError, FieldErrors};

/// Validate a write DTO, converting failures into structured per-field
/// messages.
pub fn validate<T: Validate>(value: &T) -> Result<(), CoreError> {
    value
        .validate()
        .map_err(|errors| CoreError::Validation(into_field_errors(errors)))
}

fn into_field_errors(errors: validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({}).", error.code),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
