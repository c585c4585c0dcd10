//! CSS selectors for the host page.
//!
//! These mirror the live markup and are the declared maintenance cost of
//! the scraper: when the host ships new class names, this table is the
//! only place to update.

/// Scrollable container holding the result feed.
pub const FEED_CONTAINER: &str = "div[role='feed']";

/// Anchor of one listing inside the feed; its `href` is the detail-view URL.
pub const LISTING_LINK: &str = "a[href*='/maps/place']";

/// Business name heading on the detail view. Also the structural element
/// whose presence marks the detail view as loaded.
pub const NAME: &str = "h1.DUwDvf";

pub const ADDRESS: &str = "button[data-item-id='address'] div.fontBodyMedium";

pub const WEBSITE: &str = "a[data-item-id='authority'] div.fontBodyMedium";

pub const PHONE: &str = "button[data-item-id^='phone:tel:'] div.fontBodyMedium";

/// Visible review-count text, e.g. `"1,234 reviews"`.
///
/// Note: the count is read as visible text while the rating below is read
/// from an accessibility label on a sibling subtree; locale variants of
/// the page are not guaranteed to keep the two paired.
pub const REVIEW_COUNT: &str = "button[jsaction*='reviewChart.moreReviews'] span";

/// Rating element. The value lives in its accessibility label because the
/// visible star glyphs are ambiguous for partial ratings.
pub const RATING: &str = "div[jsaction*='reviewChart.moreReviews'] div[role='img']";

pub const RATING_LABEL_ATTR: &str = "aria-label";

/// Consent interstitial some regions serve before the results page.
pub const CONSENT_URL_PREFIX: &str = "https://consent.google.com";

pub const CONSENT_AGREE: &str = "form:nth-child(2) > div > div > button";
