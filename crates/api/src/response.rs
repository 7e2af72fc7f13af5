//! Success-path response builder for the uniform envelope.
//!
//! Handlers return [`ApiResponse`] instead of raw `Json` so every success
//! response carries the `{ data, status, action_code }` contract. The error
//! side of the contract lives in [`crate::error`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use plinth_core::envelope::{Envelope, ACTION_DO_NOTHING};

/// A success response wrapped in the application envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status_code: StatusCode,
    data: Option<T>,
    action_code: &'static str,
    extra: Vec<(String, serde_json::Value)>,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status_code: StatusCode, data: Option<T>) -> Self {
        ApiResponse {
            status_code,
            data,
            action_code: ACTION_DO_NOTHING,
            extra: Vec::new(),
        }
    }

    /// 200 with a payload.
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, Some(data))
    }

    /// 201 with the created representation.
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, Some(data))
    }

    /// Override the action code (defaults to the no-op sentinel).
    pub fn action_code(mut self, action_code: &'static str) -> Self {
        self.action_code = action_code;
        self
    }

    /// Merge an extra key into the top level of the envelope. Reserved
    /// envelope keys are dropped, not overwritten.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.push((key.into(), value));
        self
    }
}

impl ApiResponse<()> {
    /// 200 with a null payload. Used by destroy, which never returns the
    /// deleted object.
    pub fn empty() -> Self {
        Self::with_status(StatusCode::OK, None)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let mut envelope = Envelope::new(self.data, self.status_code.as_u16(), self.action_code);
        for (key, value) in self.extra {
            envelope.insert_extra(key, value);
        }
        (self.status_code, Json(envelope)).into_response()
    }
}
