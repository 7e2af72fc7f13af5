//! Domain logic shared by the API and repository layers.
//!
//! This crate has no I/O: it defines the response envelope contract, the
//! error taxonomy, listing policies (pagination, sorting, filtering), and
//! the static field descriptors used for table and form metadata.

pub mod envelope;
pub mod error;
pub mod fields;
pub mod listing;
pub mod types;
pub mod validation;
