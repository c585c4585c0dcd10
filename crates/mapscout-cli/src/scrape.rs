//! The `scrape` command: one browser session, sequential queries,
//! isolated failures.

use mapscout_browser::{BrowserSession, ChromePage, PagePool};
use mapscout_core::AppConfig;
use mapscout_export::{batch_file_name, merge_runs, run_timestamp, write_batch};
use mapscout_scraper::{enumerate_listings, run_batch, FeedError};

/// Run every query on one shared browser session.
///
/// Queries run sequentially — the feed is a single shared UI surface —
/// while detail extraction inside each query fans out over the page pool.
/// A failed query logs its diagnostic and the run moves on; only a run
/// where every query failed exits non-zero.
pub(crate) async fn run(
    config: &AppConfig,
    searches: &[String],
    total: Option<usize>,
) -> anyhow::Result<()> {
    let session = BrowserSession::launch(config).await?;
    let feed_page = session.new_page(config).await?;
    let pool = PagePool::new(&session, config, config.max_concurrent_listings.max(1)).await?;

    let mut failed = 0usize;
    for query in searches {
        if let Err(e) = run_query(&feed_page, &pool, config, query, total).await {
            let diagnostic = format!("{e:#}");
            tracing::error!(query = %query, error = %diagnostic, "query failed");
            failed += 1;
        }
    }

    pool.close().await;
    if let Err(e) = feed_page.close().await {
        tracing::warn!(error = %e, "feed page close failed");
    }
    session.close().await;

    if failed == searches.len() && !searches.is_empty() {
        anyhow::bail!("all {failed} queries failed");
    }
    Ok(())
}

async fn run_query(
    feed_page: &ChromePage,
    pool: &PagePool,
    config: &AppConfig,
    query: &str,
    total: Option<usize>,
) -> anyhow::Result<()> {
    tracing::info!(query, "scraping query");

    let refs = match enumerate_listings(feed_page, query, total, config).await {
        Ok(refs) => refs,
        Err(FeedError::NeverSettled {
            iterations,
            partial,
        }) => {
            tracing::warn!(
                query,
                iterations,
                collected = partial.len(),
                "feed never stabilized; continuing with the partial listing set"
            );
            partial
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(query, listings = refs.len(), "enumeration complete");

    let batch = run_batch(pool, &refs, config).await;
    tracing::info!(
        query,
        records = batch.len(),
        dropped = refs.len().saturating_sub(batch.len()),
        "extraction complete"
    );

    let timestamp = run_timestamp(chrono::Local::now());
    let path = write_batch(&config.output_dir, &batch_file_name(&timestamp, query), &batch)?;
    println!("{query}: {} records -> {}", batch.len(), path.display());

    if let Some(merged) = merge_runs(&config.output_dir, &timestamp, query)? {
        tracing::info!(query, path = %merged.display(), "cross-run merge refreshed");
    }
    Ok(())
}
