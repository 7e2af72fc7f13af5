//! Background work dispatched from request handlers.
//!
//! Only email delivery for now. Everything here is fire-and-forget: a
//! request that triggered background work never waits on it and never
//! fails because of it.

pub mod mailer;

pub use mailer::{EmailConfig, EmailError, Mailer, OutboundEmail};
