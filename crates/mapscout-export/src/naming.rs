//! Output artifact naming.
//!
//! Artifacts are namespaced by run timestamp and normalized query so later
//! runs for the same query can be found back by filename pattern.

use chrono::{DateTime, Local};

/// Collapse whitespace runs in a query to single underscores:
/// `"bakeries in reno"` → `"bakeries_in_reno"`.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Filesystem timestamp for one run, e.g. `"20260808_141500"`.
pub fn run_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Per-run artifact name: `<timestamp>_<normalized-query>.csv`.
pub fn batch_file_name(timestamp: &str, query: &str) -> String {
    format!("{timestamp}_{}.csv", normalize_query(query))
}
