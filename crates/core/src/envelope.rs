//! The uniform response envelope.
//!
//! Every API result is wrapped as `{ data, status, action_code, ...extra }`.
//! `status` is derived purely from the HTTP status code's success range so
//! the two can never drift apart; `action_code` is a client-interpretable
//! hint that defaults to a no-op sentinel.

use serde::Serialize;

/// Action code meaning "nothing for the client to do". The default on
/// every success response.
pub const ACTION_DO_NOTHING: &str = "DO_NOTHING";

/// Action code telling the client to surface the error payload.
pub const ACTION_DISPLAY_ERROR: &str = "DISPLAY_ERROR_MESSAGES";

/// Action code telling the client to trigger its re-authentication flow.
/// Sent only for 401 responses.
pub const ACTION_REAUTHENTICATE: &str = "AUTH_TOKEN_NOT_PROVIDED_OR_INVALID";

/// Top-level envelope keys that extra fields may never overwrite.
pub const RESERVED_KEYS: &[&str] = &["data", "status", "action_code"];

/// Whether a status code is in the HTTP success class.
pub fn is_success(status_code: u16) -> bool {
    (200..=299).contains(&status_code)
}

/// The action code accompanying an error response with the given status.
///
/// 401 gets a dedicated sentinel so clients can start a re-auth flow
/// distinctly from generic errors.
pub fn action_code_for_error(status_code: u16) -> &'static str {
    if status_code == 401 {
        ACTION_REAUTHENTICATE
    } else {
        ACTION_DISPLAY_ERROR
    }
}

/// Envelope `status` field. Never set independently of the HTTP status
/// code; construct via [`EnvelopeStatus::from_status_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

impl EnvelopeStatus {
    /// Derive the envelope status from an HTTP status code.
    pub fn from_status_code(status_code: u16) -> Self {
        if is_success(status_code) {
            EnvelopeStatus::Success
        } else {
            EnvelopeStatus::Error
        }
    }
}

/// The serialized response wrapper.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub data: Option<T>,
    pub status: EnvelopeStatus,
    pub action_code: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl<T: Serialize> Envelope<T> {
    /// Build an envelope for the given payload and HTTP status code.
    pub fn new(data: Option<T>, status_code: u16, action_code: impl Into<String>) -> Self {
        Envelope {
            data,
            status: EnvelopeStatus::from_status_code(status_code),
            action_code: action_code.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Merge an extra key into the top level of the envelope.
    ///
    /// Reserved keys are silently dropped so callers can never shadow the
    /// envelope contract.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return;
        }
        self.extra.insert(key, value);
    }
}
