//! Domain types shared across the extraction pipeline.

use serde::Serialize;

/// One discovered search result, identified by the URL of its detail view.
///
/// Unique within a single enumeration pass; discovery order is the only
/// ordering that exists. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListingRef {
    pub url: String,
}

impl ListingRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl std::fmt::Display for ListingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// One extracted business.
///
/// Every field is independently optional: `None` means the field was not
/// found on the detail view, which is distinct from a field that was
/// present but empty. Serializes to the CSV columns
/// `name,address,website,phone_number,reviews_count,reviews_average`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessRecord {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    /// Total review count. `None` when the count could not be read; a page
    /// literally showing `0` yields `Some(0)`.
    pub reviews_count: Option<u32>,
    /// Star rating, conventionally within `[0.0, 5.0]` (not enforced).
    pub reviews_average: Option<f64>,
}

/// The ordered output of one query execution, in discovery order.
pub type Batch = Vec<BusinessRecord>;
