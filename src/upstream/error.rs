// Producer failure taxonomy.

use std::time::Duration;

/// Any failure raised while producing a payload. Refresh loops only record its
/// message; the variants exist for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("meal plan rejected: {0}")]
    Plan(String),

    #[error("{0}")]
    Source(String),

    #[error("missing configuration: {0}")]
    Config(String),
}
