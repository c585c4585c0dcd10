//! Best-effort dismissal of the consent interstitial some regions serve
//! before the results page.

use mapscout_browser::PageDriver;

use crate::selectors;

/// If the browser landed on the consent host, accept and navigate back to
/// `return_url`. Never fails the query: every step here is best-effort.
pub(crate) async fn dismiss_if_present(driver: &dyn PageDriver, return_url: &str) {
    let on_consent = match driver.current_url().await {
        Ok(Some(url)) => url.starts_with(selectors::CONSENT_URL_PREFIX),
        Ok(None) => false,
        Err(e) => {
            tracing::debug!(error = %e, "could not read current url for consent check");
            false
        }
    };
    if !on_consent {
        return;
    }

    tracing::info!("consent interstitial detected; accepting");
    if let Err(e) = driver.click(selectors::CONSENT_AGREE).await {
        tracing::warn!(error = %e, "consent accept click failed");
        return;
    }
    if let Err(e) = driver.navigate(return_url).await {
        tracing::warn!(error = %e, "re-navigation after consent dismissal failed");
    }
}
