use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;

/// Minimal browser capability surface the extraction pipeline depends on.
///
/// Anything that can navigate, probe selector counts, read text and
/// attributes, click, and scroll a container can back the pipeline. The
/// production implementation is [`crate::ChromePage`]; tests use scripted
/// fakes.
///
/// Absence is not an error for read operations: `text_of` and
/// `attribute_of` return `None` when the selector matches nothing, and
/// `count` returns `0`. Only protocol-level failures surface as errors.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and wait for the document load to finish, bounded
    /// by the driver's navigation timeout.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Number of elements currently matching `selector`. A cheap probe —
    /// the matched elements are never materialized.
    async fn count(&self, selector: &str) -> Result<usize, DriverError>;

    /// Inner text of the first element matching `selector`, or `None` when
    /// nothing matches.
    async fn text_of(&self, selector: &str) -> Result<Option<String>, DriverError>;

    /// Value of attribute `name` on the first element matching `selector`,
    /// or `None` when the element or the attribute is absent.
    async fn attribute_of(&self, selector: &str, name: &str)
        -> Result<Option<String>, DriverError>;

    /// Attribute `name` of every element matching `selector`, in document
    /// order, skipping elements without the attribute.
    async fn collect_attributes(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<String>, DriverError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Scroll the container matched by `selector` to its current bottom.
    /// A missing container is a no-op.
    async fn scroll(&self, selector: &str) -> Result<(), DriverError>;

    /// Wait until `selector` matches at least one element.
    ///
    /// # Errors
    ///
    /// [`DriverError::WaitTimeout`] once `timeout` elapses without a match.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Unconditional pause.
    async fn wait(&self, duration: Duration);

    /// Current page URL, when the browser reports one.
    async fn current_url(&self) -> Result<Option<String>, DriverError>;
}
