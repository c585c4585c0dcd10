use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {waited_ms}ms waiting for \"{selector}\"")]
    WaitTimeout { selector: String, waited_ms: u64 },

    #[error("browser protocol error: {0}")]
    Protocol(#[from] chromiumoxide::error::CdpError),
}
