//! Browser capability layer.
//!
//! The extraction pipeline depends only on the [`PageDriver`] trait — a
//! minimal navigate/probe/read/click/scroll surface — so the automation
//! engine stays swappable and tests run against scripted fakes. The
//! production implementation drives Chrome over CDP via `chromiumoxide`.

pub mod driver;
pub mod error;
pub mod pool;
pub mod retry;
pub mod session;

pub use driver::PageDriver;
pub use error::DriverError;
pub use pool::{PageLease, PagePool};
pub use retry::retry_with_backoff;
pub use session::{BrowserSession, ChromePage};
