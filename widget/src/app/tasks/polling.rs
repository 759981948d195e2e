//! Scoped periodic tasks.
//!
//! A [`PollingTask`] owns the spawned loop. Stopping or dropping it aborts the
//! loop, so a widget that goes away never leaves a timer behind.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Periodic background loop, aborted on [`stop`](PollingTask::stop) or drop.
#[derive(Debug)]
pub struct PollingTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl PollingTask {
    /// Run `tick` immediately and then every `period`.
    ///
    /// Ticks never overlap: a slow tick delays the next one and missed ticks
    /// are skipped rather than replayed.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        debug!(task = name, ?period, "Polling task started");

        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = self.name, "Polling task stopped");
        }
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.stop();
    }
}
