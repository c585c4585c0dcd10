use thiserror::Error;

use mapscout_browser::DriverError;
use mapscout_core::ListingRef;

/// Query-level failures raised while discovering the listing set.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The search page or its feed container never appeared within the
    /// navigation bound. Fatal for the whole query.
    #[error("search navigation for \"{query}\" failed: {source}")]
    Navigation {
        query: String,
        #[source]
        source: DriverError,
    },

    /// The scroll loop hit its safety cap without reaching a stop
    /// condition. The references collected so far ride along so the caller
    /// can degrade to a partial result instead of losing the query.
    #[error("feed never stabilized after {iterations} scroll iterations ({} listings collected)", .partial.len())]
    NeverSettled {
        iterations: usize,
        partial: Vec<ListingRef>,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Hard failure for one listing: the record is discarded and the batch
/// continues without it.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("detail navigation for {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("detail view for {url} never presented its name heading")]
    MissingAnchor { url: String },
}
