//! Timers
//!
//! Protocol delays go through the `Timer` trait so a test can observe or
//! skip them while the probe ordering stays the same.

use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current run for a protocol delay.
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by `tokio::time::sleep`.
///
/// Under a paused tokio clock (`start_paused = true`) it completes instantly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
