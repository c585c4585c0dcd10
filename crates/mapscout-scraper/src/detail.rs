//! Per-listing detail extraction.

use std::time::Duration;

use mapscout_browser::PageDriver;
use mapscout_core::{AppConfig, BusinessRecord, ListingRef};

use crate::error::ListingError;
use crate::parse;
use crate::selectors;

/// Extract one business record from its detail view.
///
/// Navigation and the name heading are the only hard requirements; each of
/// the six fields is then read independently and degrades to `None` on its
/// own. Given the same DOM, the result is deterministic.
///
/// # Errors
///
/// [`ListingError::Navigation`] when the detail view fails to load,
/// [`ListingError::MissingAnchor`] when it loads without its name heading.
/// Both discard the record; neither aborts the batch.
pub async fn extract_listing(
    driver: &dyn PageDriver,
    reference: &ListingRef,
    config: &AppConfig,
) -> Result<BusinessRecord, ListingError> {
    driver
        .navigate(&reference.url)
        .await
        .map_err(|source| ListingError::Navigation {
            url: reference.url.clone(),
            source,
        })?;
    driver
        .wait_for(
            selectors::NAME,
            Duration::from_secs(config.nav_timeout_secs),
        )
        .await
        .map_err(|_| ListingError::MissingAnchor {
            url: reference.url.clone(),
        })?;

    let url = reference.url.as_str();
    Ok(BusinessRecord {
        name: text_field(driver, url, selectors::NAME, trimmed).await,
        address: text_field(driver, url, selectors::ADDRESS, trimmed).await,
        website: text_field(driver, url, selectors::WEBSITE, trimmed).await,
        phone_number: text_field(driver, url, selectors::PHONE, trimmed).await,
        reviews_count: text_field(
            driver,
            url,
            selectors::REVIEW_COUNT,
            parse::parse_review_count,
        )
        .await,
        reviews_average: attribute_field(
            driver,
            url,
            selectors::RATING,
            selectors::RATING_LABEL_ATTR,
            parse::parse_rating,
        )
        .await,
    })
}

fn trimmed(text: &str) -> Option<String> {
    Some(text.trim().to_owned())
}

/// Locate-and-parse primitive used uniformly by every text field: read the
/// anchor's text, apply `parse`, degrade to `None` on absence, read
/// failure, or parse failure. This is the soft half of the two-tier
/// failure contract — nothing in here can discard the record.
async fn text_field<T>(
    driver: &dyn PageDriver,
    url: &str,
    selector: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    match driver.text_of(selector).await {
        Ok(Some(text)) => {
            let parsed = parse(&text);
            if parsed.is_none() {
                tracing::debug!(url, selector, text = %text, "field text did not parse");
            }
            parsed
        }
        Ok(None) => {
            tracing::debug!(url, selector, "field anchor absent");
            None
        }
        Err(e) => {
            tracing::debug!(url, selector, error = %e, "field read failed");
            None
        }
    }
}

/// Attribute flavor of [`text_field`], for values that live in an
/// attribute rather than visible text.
async fn attribute_field<T>(
    driver: &dyn PageDriver,
    url: &str,
    selector: &str,
    name: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    match driver.attribute_of(selector, name).await {
        Ok(Some(value)) => {
            let parsed = parse(&value);
            if parsed.is_none() {
                tracing::debug!(url, selector, value = %value, "field attribute did not parse");
            }
            parsed
        }
        Ok(None) => {
            tracing::debug!(url, selector, name, "field attribute absent");
            None
        }
        Err(e) => {
            tracing::debug!(url, selector, error = %e, "field read failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
