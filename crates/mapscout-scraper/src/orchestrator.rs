//! Batch orchestration: bounded fan-out of detail extractions.

use futures::stream::{self, StreamExt};

use mapscout_browser::{retry_with_backoff, PageDriver, PagePool};
use mapscout_core::{AppConfig, Batch, BusinessRecord, ListingRef};

use crate::detail::extract_listing;
use crate::error::ListingError;

/// Fan the reference list out over the page pool with bounded concurrency.
///
/// Each worker leases one page exclusively for the duration of one
/// listing's extraction, so no tab state is ever shared. Completed records
/// carry their original index and the batch is re-sorted into reference
/// order before returning, keeping output reproducible regardless of
/// completion order. A hard listing failure is absorbed here: logged once
/// with the failing reference and excluded from the batch.
pub async fn run_batch<D: PageDriver>(
    pool: &PagePool<D>,
    refs: &[ListingRef],
    config: &AppConfig,
) -> Batch {
    let concurrency = config.max_concurrent_listings.max(1);

    let mut results: Vec<(usize, Result<BusinessRecord, ListingError>)> =
        stream::iter(refs.iter().enumerate())
            .map(|(index, reference)| async move {
                let page = pool.acquire().await;
                let result = extract_with_retry(&*page, reference, config).await;
                (index, result)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

    results.sort_by_key(|(index, _)| *index);

    let mut batch = Batch::with_capacity(refs.len());
    for (index, result) in results {
        match result {
            Ok(record) => batch.push(record),
            Err(e) => {
                tracing::warn!(listing = %refs[index], error = %e, "listing dropped after hard failure");
            }
        }
    }
    batch
}

/// Both variants are navigation-shaped timeouts against a live site and
/// worth one more attempt.
fn is_retriable(err: &ListingError) -> bool {
    matches!(
        err,
        ListingError::Navigation { .. } | ListingError::MissingAnchor { .. }
    )
}

async fn extract_with_retry<D: PageDriver>(
    driver: &D,
    reference: &ListingRef,
    config: &AppConfig,
) -> Result<BusinessRecord, ListingError> {
    retry_with_backoff(
        config.max_retries,
        config.retry_backoff_base_secs,
        is_retriable,
        || extract_listing(driver, reference, config),
    )
    .await
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
