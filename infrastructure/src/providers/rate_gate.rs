//! Interval-based rate gate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tooltrial_application::RateGate;
use tracing::trace;

/// Spaces calls to each model at least `interval` apart.
///
/// One instance is shared (behind an `Arc`) by every concurrent episode.
/// Each caller reserves the next free slot under the lock and sleeps
/// outside it, so waiting callers never block each other's reservations.
pub struct IntervalRateGate {
    interval: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl IntervalRateGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Gate allowing `requests_per_minute` calls per model.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self::new(Duration::from_secs(60) / rpm)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl RateGate for IntervalRateGate {
    async fn acquire(&self, model: &str) {
        let slot = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = slots.get(model).copied().filter(|s| *s > now).unwrap_or(now);
            slots.insert(model.to_string(), slot + self.interval);
            slot
        };

        let now = Instant::now();
        if slot > now {
            trace!("Rate gate: waiting {:?} for {}", slot - now, model);
            tokio::time::sleep_until(slot).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_per_minute_interval() {
        assert_eq!(
            IntervalRateGate::per_minute(120).interval(),
            Duration::from_millis(500)
        );
        assert_eq!(
            IntervalRateGate::per_minute(0).interval(),
            Duration::from_secs(60)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_are_spaced_per_model() {
        let gate = IntervalRateGate::new(Duration::from_secs(1));
        let start = Instant::now();

        gate.acquire("gpt-4o").await;
        gate.acquire("gpt-4o").await;
        gate.acquire("gpt-4o").await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));

        // Another model has its own schedule
        let before = Instant::now();
        gate.acquire("qwen").await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_get_distinct_slots() {
        let gate = Arc::new(IntervalRateGate::new(Duration::from_millis(250)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move {
                    gate.acquire("gpt-4o").await;
                    Instant::now()
                })
            })
            .collect();

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap() - start);
        }
        finished.sort();
        assert_eq!(
            finished,
            vec![
                Duration::ZERO,
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_millis(750),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gate_does_not_wait() {
        let gate = IntervalRateGate::new(Duration::from_secs(1));
        gate.acquire("gpt-4o").await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let before = Instant::now();
        gate.acquire("gpt-4o").await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
