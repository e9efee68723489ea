// Package workers exposes the producer interface driven by refresh loops.

use crate::upstream::ProducerError;

/// Producer interface: fetch or compute one payload, or fail.
#[async_trait::async_trait]
pub trait Producer: Send + Sync {
    type Output: Send + Sync + 'static;

    /// Produces a fresh payload. Called outside of any slot lock.
    async fn produce(&self) -> Result<Self::Output, ProducerError>;
}
