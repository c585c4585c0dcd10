//! Scripted [`PageDriver`] fake for pipeline tests.
//!
//! Count probes are scripted as a queue (the last value repeats once
//! drained), detail-view content is keyed by the URL most recently
//! navigated to, and navigation failures can be injected per URL with a
//! remaining-failure budget to exercise retries. Clones share the script
//! and the recorded interactions but keep their own current URL, so one
//! fake can back every page in a pool.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use mapscout_browser::{DriverError, PageDriver};
use mapscout_core::AppConfig;

/// Configuration used across pipeline tests: fast settle polling, no
/// retry backoff delay.
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        log_level: "debug".to_owned(),
        headless: true,
        block_images: true,
        output_dir: "output".into(),
        search_url_base: "https://maps.example.test/search/".to_owned(),
        nav_timeout_secs: 5,
        settle_poll_ms: 1,
        settle_timeout_secs: 1,
        max_scroll_iterations: 40,
        max_concurrent_listings: 2,
        max_retries: 1,
        retry_backoff_base_secs: 0,
    }
}

#[derive(Default)]
struct Shared {
    /// Successive `count` replies; the last value repeats once drained.
    counts: Mutex<VecDeque<usize>>,
    last_count: Mutex<usize>,
    /// Reply for `collect_attributes` on the listing-link selector.
    hrefs: Mutex<Vec<String>>,
    /// `(url, selector)` → inner text on that detail view.
    texts: Mutex<HashMap<(String, String), String>>,
    /// `(url, selector, attribute)` → attribute value.
    attributes: Mutex<HashMap<(String, String, String), String>>,
    /// URL → remaining navigation failures before it starts succeeding.
    failing_navigations: Mutex<HashMap<String, usize>>,
    /// Selectors `wait_for` should time out on.
    absent: Mutex<HashSet<String>>,
    navigations: Mutex<Vec<String>>,
    scrolls: AtomicUsize,
}

pub(crate) struct FakeDriver {
    shared: Arc<Shared>,
    current: Mutex<Option<String>>,
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            current: Mutex::new(None),
        }
    }
}

impl Clone for FakeDriver {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            current: Mutex::new(None),
        }
    }
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(self, counts: &[usize]) -> Self {
        *self.shared.counts.lock().unwrap() = counts.iter().copied().collect();
        self
    }

    pub fn with_hrefs(self, hrefs: &[&str]) -> Self {
        *self.shared.hrefs.lock().unwrap() = hrefs.iter().map(|h| (*h).to_owned()).collect();
        self
    }

    pub fn with_text(self, url: &str, selector: &str, text: &str) -> Self {
        self.shared
            .texts
            .lock()
            .unwrap()
            .insert((url.to_owned(), selector.to_owned()), text.to_owned());
        self
    }

    pub fn with_attribute(self, url: &str, selector: &str, name: &str, value: &str) -> Self {
        self.shared.attributes.lock().unwrap().insert(
            (url.to_owned(), selector.to_owned(), name.to_owned()),
            value.to_owned(),
        );
        self
    }

    pub fn failing_navigation(self, url: &str, times: usize) -> Self {
        self.shared
            .failing_navigations
            .lock()
            .unwrap()
            .insert(url.to_owned(), times);
        self
    }

    pub fn with_absent(self, selector: &str) -> Self {
        self.shared
            .absent
            .lock()
            .unwrap()
            .insert(selector.to_owned());
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.shared.navigations.lock().unwrap().clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.shared.scrolls.load(Ordering::SeqCst)
    }

    fn current_url_key(&self) -> String {
        self.current.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.shared
            .navigations
            .lock()
            .unwrap()
            .push(url.to_owned());
        let mut failing = self.shared.failing_navigations.lock().unwrap();
        if let Some(remaining) = failing.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DriverError::Navigation {
                    url: url.to_owned(),
                    reason: "scripted failure".to_owned(),
                });
            }
        }
        drop(failing);
        *self.current.lock().unwrap() = Some(url.to_owned());
        Ok(())
    }

    async fn count(&self, _selector: &str) -> Result<usize, DriverError> {
        let next = self.shared.counts.lock().unwrap().pop_front();
        let mut last = self.shared.last_count.lock().unwrap();
        if let Some(value) = next {
            *last = value;
        }
        Ok(*last)
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, DriverError> {
        let key = (self.current_url_key(), selector.to_owned());
        Ok(self.shared.texts.lock().unwrap().get(&key).cloned())
    }

    async fn attribute_of(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let key = (self.current_url_key(), selector.to_owned(), name.to_owned());
        Ok(self.shared.attributes.lock().unwrap().get(&key).cloned())
    }

    async fn collect_attributes(
        &self,
        _selector: &str,
        _name: &str,
    ) -> Result<Vec<String>, DriverError> {
        Ok(self.shared.hrefs.lock().unwrap().clone())
    }

    async fn click(&self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn scroll(&self, _selector: &str) -> Result<(), DriverError> {
        self.shared.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        if self.shared.absent.lock().unwrap().contains(selector) {
            return Err(DriverError::WaitTimeout {
                selector: selector.to_owned(),
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }

    async fn wait(&self, _duration: Duration) {
        // Scripted time: settle loops advance through the count queue
        // without real sleeping.
    }

    async fn current_url(&self) -> Result<Option<String>, DriverError> {
        Ok(self.current.lock().unwrap().clone())
    }
}
