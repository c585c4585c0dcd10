//! Record sink: persists finished batches as CSV and merges the artifacts
//! of repeated runs for the same query.
//!
//! Purely file-level — nothing in here touches the browser or gates
//! extraction correctness.

mod merge;
mod naming;
mod sink;

use thiserror::Error;

pub use merge::merge_runs;
pub use naming::{batch_file_name, normalize_query, run_timestamp};
pub use sink::write_batch;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
