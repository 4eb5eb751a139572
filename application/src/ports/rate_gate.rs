//! Rate gate port
//!
//! A shared throttle bounding provider calls per model. Every attempt of
//! the provider call layer passes through it, including retries and
//! failovers.

use async_trait::async_trait;

#[async_trait]
pub trait RateGate: Send + Sync {
    /// Wait until a call to `model` may proceed.
    async fn acquire(&self, model: &str);
}

/// Gate that never waits
pub struct NoRateGate;

#[async_trait]
impl RateGate for NoRateGate {
    async fn acquire(&self, _model: &str) {}
}
