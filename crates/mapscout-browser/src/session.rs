//! Chrome-backed implementation of the [`PageDriver`] capability set.
//!
//! One [`BrowserSession`] owns the Chrome process and the CDP event
//! handler; [`ChromePage`] wraps a single tab. Reads go through small
//! `evaluate` snippets so a count probe never materializes elements, and
//! selectors are JSON-escaped before being spliced into scripts.

use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use async_trait::async_trait;
use mapscout_core::AppConfig;

use crate::driver::PageDriver;
use crate::error::DriverError;

/// Interval between selector probes inside [`PageDriver::wait_for`].
const WAIT_POLL: Duration = Duration::from_millis(250);

/// A running browser plus the spawned task draining its CDP event stream.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chrome according to `config` (headless mode, image blocking)
    /// and start draining its event handler.
    ///
    /// # Errors
    ///
    /// [`DriverError::Launch`] when the browser configuration is invalid,
    /// [`DriverError::Protocol`] when the process fails to start.
    pub async fn launch(config: &AppConfig) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder()
            .window_size(1280, 900)
            .request_timeout(Duration::from_secs(config.nav_timeout_secs));
        if !config.headless {
            builder = builder.with_head();
        }
        if config.block_images {
            builder = builder.arg("--blink-settings=imagesEnabled=false");
        }
        let browser_config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!(error = %e, "browser handler event error");
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a fresh blank tab wrapped as a [`ChromePage`].
    ///
    /// # Errors
    ///
    /// [`DriverError::Protocol`] when the tab cannot be created.
    pub async fn new_page(&self, config: &AppConfig) -> Result<ChromePage, DriverError> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromePage::new(
            page,
            Duration::from_secs(config.nav_timeout_secs),
        ))
    }

    /// Shut the browser down and stop the handler task. Best-effort: close
    /// failures are logged, never propagated.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}

/// One browser tab implementing the [`PageDriver`] capability set.
pub struct ChromePage {
    page: Page,
    nav_timeout: Duration,
}

impl ChromePage {
    pub fn new(page: Page, nav_timeout: Duration) -> Self {
        Self { page, nav_timeout }
    }

    /// Close the underlying tab.
    ///
    /// # Errors
    ///
    /// [`DriverError::Protocol`] when the close command fails; the browser
    /// will still reap the tab eventually.
    pub async fn close(self) -> Result<(), DriverError> {
        self.page.close().await?;
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, DriverError> {
        let result = self.page.evaluate(script).await?;
        result
            .into_value::<T>()
            .map_err(|e| DriverError::Protocol(e.into()))
    }
}

/// JSON-escape `value` for splicing into an evaluate snippet.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let load = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.nav_timeout, load).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DriverError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(DriverError::Navigation {
                url: url.to_owned(),
                reason: format!("no load event within {}s", self.nav_timeout.as_secs()),
            }),
        }
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        let script = format!(
            "document.querySelectorAll({}).length",
            js_string(selector)
        );
        self.eval(script).await
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, DriverError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.innerText : null; }})()",
            js_string(selector)
        );
        self.eval(script).await
    }

    async fn attribute_of(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.getAttribute({}) : null; }})()",
            js_string(selector),
            js_string(name)
        );
        self.eval(script).await
    }

    async fn collect_attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<String>, DriverError> {
        let script = format!(
            "Array.from(document.querySelectorAll({}), el => el.getAttribute({})).filter(v => v !== null)",
            js_string(selector),
            js_string(name)
        );
        self.eval(script).await
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        Ok(())
    }

    async fn scroll(&self, selector: &str) -> Result<(), DriverError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.scrollTop = el.scrollHeight; return true; }})()",
            js_string(selector)
        );
        let found: bool = self.eval(script).await?;
        if !found {
            tracing::debug!(selector, "scroll container not present");
        }
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let started = Instant::now();
        loop {
            if self.count(selector).await? > 0 {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(DriverError::WaitTimeout {
                    selector: selector.to_owned(),
                    waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(WAIT_POLL).await;
        }
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn current_url(&self) -> Result<Option<String>, DriverError> {
        Ok(self.page.url().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_string_escapes_quotes_and_backslashes() {
        assert_eq!(js_string("a[href*='/maps/place']"), r#""a[href*='/maps/place']""#);
        assert_eq!(js_string(r#"div["x"]"#), r#""div[\"x\"]""#);
        assert_eq!(js_string(r"back\slash"), r#""back\\slash""#);
    }
}
