/// Decorative busy indicator shown while a refresh is in flight
///
/// A tokio interval task bumps a rotation counter. It is not tied to real
/// progress. The task lives exactly as long as the `BusyIndicator` value:
/// dropping it aborts the task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct BusyIndicator {
    rotation: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl BusyIndicator {
    /// Start rotating. Must be called from within a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let rotation = Arc::new(AtomicUsize::new(0));
        let counter = rotation.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });

        Self { rotation, handle }
    }

    pub fn rotation(&self) -> usize {
        self.rotation.load(Ordering::Relaxed)
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.rotation() % SPINNER_FRAMES.len()]
    }
}

impl Drop for BusyIndicator {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rotation_advances_per_tick() {
        let busy = BusyIndicator::start(Duration::from_millis(100));
        assert_eq!(busy.rotation(), 0);

        // Paused clock auto-advances while the test sleeps
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(busy.rotation(), 3);
        assert_eq!(busy.frame(), SPINNER_FRAMES[3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_rotation() {
        let busy = BusyIndicator::start(Duration::from_millis(100));
        let rotation = busy.rotation.clone();

        tokio::time::sleep(Duration::from_millis(250)).await;
        let before = rotation.load(Ordering::Relaxed);
        drop(busy);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(rotation.load(Ordering::Relaxed), before);
        // Only the test's clone remains once the aborted task is reaped
        assert_eq!(Arc::strong_count(&rotation), 1);
    }
}
