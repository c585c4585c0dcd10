//! Feed enumeration: scroll-termination state machine plus the single
//! materialization pass that turns the fully revealed feed into listing
//! references.

use std::collections::HashSet;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use mapscout_browser::{DriverError, PageDriver};
use mapscout_core::{AppConfig, ListingRef};

use crate::consent;
use crate::error::FeedError;
use crate::selectors;

/// Outcome of one scroll step over the result feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    /// The feed grew; keep scrolling.
    Continue,
    /// At least the requested number of listings is present.
    TargetReached,
    /// No growth since the previous step; the feed is fully enumerated.
    Exhausted,
    /// The iteration cap was hit without a stop condition; the page never
    /// stabilized.
    Ambiguous,
}

/// Scroll-termination state machine for the virtualized result feed.
///
/// Each [`advance`](Self::advance) call scrolls the feed container once,
/// waits for the asynchronous load to settle, then reads the listing count
/// as a cheap integer probe and decides whether enumeration is done.
/// `previous_count` is monotonically non-decreasing as long as the page
/// does not remove items.
pub struct ScrollFeed<'a> {
    driver: &'a dyn PageDriver,
    target: Option<usize>,
    previous_count: usize,
    iterations: usize,
    settle_poll: Duration,
    settle_timeout: Duration,
    max_iterations: usize,
}

impl<'a> ScrollFeed<'a> {
    pub fn new(driver: &'a dyn PageDriver, target: Option<usize>, config: &AppConfig) -> Self {
        Self {
            driver,
            target,
            previous_count: 0,
            iterations: 0,
            // A zero poll interval would never accumulate toward the
            // settle timeout.
            settle_poll: Duration::from_millis(config.settle_poll_ms.max(1)),
            settle_timeout: Duration::from_secs(config.settle_timeout_secs),
            max_iterations: config.max_scroll_iterations,
        }
    }

    /// Scroll steps taken so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One scroll step: scroll the feed, let the load settle, decide.
    ///
    /// # Errors
    ///
    /// Propagates driver failures from the scroll or the count probes.
    pub async fn advance(&mut self) -> Result<ScrollDecision, DriverError> {
        if self.iterations >= self.max_iterations {
            return Ok(ScrollDecision::Ambiguous);
        }
        self.iterations += 1;

        self.driver.scroll(selectors::FEED_CONTAINER).await?;
        let current = self.settled_count().await?;
        tracing::debug!(iteration = self.iterations, count = current, "scroll step");

        if self.target.is_some_and(|target| current >= target) {
            return Ok(ScrollDecision::TargetReached);
        }
        if current == self.previous_count {
            return Ok(ScrollDecision::Exhausted);
        }
        self.previous_count = current;
        Ok(ScrollDecision::Continue)
    }

    /// Adaptive settle: probe the listing count until two consecutive
    /// reads agree, bounded by the settle timeout. A count read mid-load
    /// would make growth look stalled and end enumeration early.
    async fn settled_count(&self) -> Result<usize, DriverError> {
        let mut last = self.driver.count(selectors::LISTING_LINK).await?;
        let mut waited = Duration::ZERO;
        while waited < self.settle_timeout {
            self.driver.wait(self.settle_poll).await;
            waited += self.settle_poll;
            let current = self.driver.count(selectors::LISTING_LINK).await?;
            if current == last {
                return Ok(current);
            }
            last = current;
        }
        Ok(last)
    }
}

/// Build the search URL for a free-text query.
pub fn search_url(base: &str, query: &str) -> String {
    format!("{base}{}", utf8_percent_encode(query, NON_ALPHANUMERIC))
}

/// Discover the listing set for `query`, in on-page discovery order.
///
/// Navigates to the search results, drives [`ScrollFeed`] to a stop
/// decision, then materializes the reference set exactly once.
/// Intermediate iterations only read counts, which keeps each scroll step
/// cheap on long feeds.
///
/// # Errors
///
/// - [`FeedError::Navigation`] — the search page or the feed container did
///   not appear within the navigation bound. Fatal for the query.
/// - [`FeedError::NeverSettled`] — the scroll loop hit its iteration cap;
///   the references collected so far are carried in the error.
/// - [`FeedError::Driver`] — the browser failed mid-enumeration.
pub async fn enumerate_listings(
    driver: &dyn PageDriver,
    query: &str,
    target: Option<usize>,
    config: &AppConfig,
) -> Result<Vec<ListingRef>, FeedError> {
    let url = search_url(&config.search_url_base, query);
    driver
        .navigate(&url)
        .await
        .map_err(|source| FeedError::Navigation {
            query: query.to_owned(),
            source,
        })?;

    consent::dismiss_if_present(driver, &url).await;

    driver
        .wait_for(
            selectors::FEED_CONTAINER,
            Duration::from_secs(config.nav_timeout_secs),
        )
        .await
        .map_err(|source| FeedError::Navigation {
            query: query.to_owned(),
            source,
        })?;

    let mut feed = ScrollFeed::new(driver, target, config);
    loop {
        match feed.advance().await? {
            ScrollDecision::Continue => {}
            ScrollDecision::TargetReached => {
                let mut refs = materialize(driver).await?;
                if let Some(target) = target {
                    refs.truncate(target);
                }
                return Ok(refs);
            }
            ScrollDecision::Exhausted => return Ok(materialize(driver).await?),
            ScrollDecision::Ambiguous => {
                let partial = materialize(driver).await.unwrap_or_default();
                return Err(FeedError::NeverSettled {
                    iterations: feed.iterations(),
                    partial,
                });
            }
        }
    }
}

/// Materialize the currently visible references, de-duplicated while
/// preserving discovery order.
async fn materialize(driver: &dyn PageDriver) -> Result<Vec<ListingRef>, DriverError> {
    let hrefs = driver
        .collect_attributes(selectors::LISTING_LINK, "href")
        .await?;
    let mut seen = HashSet::new();
    Ok(hrefs
        .into_iter()
        .filter(|href| seen.insert(href.clone()))
        .map(ListingRef::new)
        .collect())
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod tests;
