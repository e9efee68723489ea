// Scripted producer for refresh loop tests.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::time::ManualClock;
use crate::upstream::ProducerError;
use crate::workers::Producer;

/// Returns scripted results in order, then `fallback` (or an error) forever.
/// Optionally moves a [`ManualClock`] forward on every call to simulate a slow
/// upstream.
pub struct FakeProducer<T> {
    script: Mutex<VecDeque<Result<T, String>>>,
    fallback: Option<T>,
    latency: Option<(Arc<ManualClock>, Duration)>,
    calls: Arc<AtomicUsize>,
}

impl<T: Clone + Send + Sync + 'static> FakeProducer<T> {
    pub fn new(script: Vec<Result<T, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            latency: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn then_always(mut self, value: T) -> Self {
        self.fallback = Some(value);
        self
    }

    pub fn with_latency(mut self, clock: Arc<ManualClock>, by: Duration) -> Self {
        self.latency = Some((clock, by));
        self
    }

    /// Shared call counter, readable after the producer moved into a loop.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait::async_trait]
impl<T: Clone + Send + Sync + 'static> Producer for FakeProducer<T> {
    type Output = T;

    async fn produce(&self) -> Result<T, ProducerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((clock, by)) = &self.latency {
            clock.advance(*by);
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(msg)) => Err(ProducerError::Source(msg)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ProducerError::Source("script exhausted".to_string())),
        }
    }
}
