//! Shared query parameter types for API handlers.

use std::collections::HashMap;

use serde::Deserialize;

use plinth_core::error::CoreError;
use plinth_core::listing::{resolve_list_query, ListQuery};

/// Raw query parameters of a list request.
///
/// Captured as a plain string map so malformed values never produce a
/// framework-level rejection; interpretation (clamping, sort validation,
/// filter allow-listing) happens in [`ListParams::resolve`].
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ListParams(pub HashMap<String, String>);

impl ListParams {
    /// Resolve the raw parameters against a resource's sortable and
    /// filterable field lists.
    pub fn resolve(&self, sortable: &[&str], filterable: &[&str]) -> Result<ListQuery, CoreError> {
        resolve_list_query(&self.0, sortable, filterable)
    }
}
