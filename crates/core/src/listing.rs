//! Listing policies: pagination, sorting, and filter allow-lists.
//!
//! These are pure functions over raw query parameters; the repository
//! layer turns the resulting [`ListQuery`] into SQL.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::CoreError;

/// Page size applied when the client does not send `page-size`.
pub const DEFAULT_PAGE_SIZE: i64 = 24;

/// Hard cap on `page-size`, regardless of what the client asks for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameter naming the 1-based page.
pub const PAGE_PARAM: &str = "page";

/// Query parameter overriding the page size.
pub const PAGE_SIZE_PARAM: &str = "page-size";

/// Query parameter naming the sort field, optionally `-` prefixed.
pub const SORT_PARAM: &str = "sort_by";

/// A clamped pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number, at least 1.
    pub page: i64,
    /// Rows per page, in `1..=MAX_PAGE_SIZE`.
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from raw query values, clamping out-of-range input.
    ///
    /// Non-numeric values fall back to the defaults rather than erroring.
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let page_size = page_size
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        PageRequest { page, page_size }
    }

    /// SQL OFFSET for this page.
    ///
    /// Saturating: a huge client-supplied page number yields the maximum
    /// offset (an empty page) instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// One page of results, serialized inside the envelope's `data`.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    /// Total row count across all pages (after filtering).
    pub count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, request: &PageRequest) -> Self {
        let total_pages = if count == 0 {
            0
        } else {
            (count + request.page_size - 1) / request.page_size
        };
        Page {
            results,
            count,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        }
    }
}

/// A validated sort directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    /// Parse a raw `sort_by` value (`name` or `-name`) against the
    /// resource's sortable field list.
    ///
    /// An unknown field is a validation error, never silently ignored.
    pub fn parse(raw: &str, sortable: &[&str]) -> Result<Sort, CoreError> {
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if !sortable.contains(&field) {
            return Err(CoreError::field(
                SORT_PARAM,
                "Invalid field name for sorting.",
            ));
        }
        Ok(Sort {
            field: field.to_string(),
            descending,
        })
    }
}

/// A sort option surfaced to clients in table metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SortOption {
    /// The `sort_by` value to send back (e.g. `-name`).
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// The default sort-options set. Resources may extend this.
pub fn default_sort_options() -> Vec<SortOption> {
    vec![
        SortOption {
            id: "name",
            label: "A to Z",
        },
        SortOption {
            id: "-name",
            label: "Z to A",
        },
    ]
}

/// A fully resolved list request: pagination, optional sort, and the
/// surviving filters.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: PageRequest,
    pub sort: Option<Sort>,
    pub filters: BTreeMap<String, String>,
}

/// Resolve raw query parameters into a [`ListQuery`] for a resource.
///
/// - `page` / `page-size` are clamped per [`PageRequest::from_raw`].
/// - `sort_by` must name a sortable field or the whole request fails.
/// - Remaining parameters are kept only if allow-listed as filters;
///   anything else is ignored for filtering purposes, not an error.
pub fn resolve_list_query(
    params: &HashMap<String, String>,
    sortable: &[&str],
    filterable: &[&str],
) -> Result<ListQuery, CoreError> {
    let page = PageRequest::from_raw(
        params.get(PAGE_PARAM).map(String::as_str),
        params.get(PAGE_SIZE_PARAM).map(String::as_str),
    );

    let sort = params
        .get(SORT_PARAM)
        .map(|raw| Sort::parse(raw, sortable))
        .transpose()?;

    let filters = params
        .iter()
        .filter(|(key, _)| filterable.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(ListQuery {
        page,
        sort,
        filters,
    })
}
