use std::path::PathBuf;

/// Runtime configuration, sourced from `MAPSCOUT_*` environment variables
/// with sensible defaults. CLI flags override the per-run knobs (headless
/// mode, output directory, worker count) after loading.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Launch the browser without a visible window.
    pub headless: bool,
    /// Disable image loading to cut bandwidth during scraping.
    pub block_images: bool,
    pub output_dir: PathBuf,
    /// Base the percent-encoded query is appended to.
    pub search_url_base: String,
    /// Bound on every navigation and structural-element wait. Exceeding it
    /// is a hard failure for the operation, never a hang.
    pub nav_timeout_secs: u64,
    /// Interval between listing-count probes while waiting for the feed to
    /// settle after a scroll.
    pub settle_poll_ms: u64,
    /// Upper bound on one post-scroll settle wait.
    pub settle_timeout_secs: u64,
    /// Safety cap on scroll iterations against a page that never stabilizes.
    pub max_scroll_iterations: usize,
    /// Concurrent detail extractions; each worker owns one browser page.
    pub max_concurrent_listings: usize,
    /// Additional attempts after the first failure for transient
    /// navigation errors during detail extraction.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff between retries.
    pub retry_backoff_base_secs: u64,
}
