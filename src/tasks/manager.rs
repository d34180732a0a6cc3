use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

use crate::models::Error;

/// Runs the bot's periodic maintenance loops and stops them together at
/// shutdown
#[derive(Default)]
pub struct BackgroundTasks {
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn a loop that runs `pass` once per `period` until shutdown
    ///
    /// The first pass runs immediately. Each pass is awaited before the next
    /// tick is polled, so a pass never overlaps itself; ticks missed while a
    /// pass runs long are skipped rather than bunched. A failing pass is
    /// logged and the loop keeps going.
    pub fn spawn_periodic<F, Fut>(&self, name: &'static str, period: Duration, mut pass: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!("Started background task '{}' (every {:?})", name, period);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Stopped background task '{}'", name);
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = pass().await {
                            error!("Background task '{}' pass failed: {}", name, e);
                        }
                    }
                }
            }
        });
    }

    /// Cancel all loops and wait for them to finish
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn pass_runs_immediately_and_then_on_each_tick() {
        let tasks = BackgroundTasks::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        tasks.spawn_periodic("counter", Duration::from_secs(60), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tasks.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failing_pass_does_not_stop_the_loop() {
        let tasks = BackgroundTasks::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        tasks.spawn_periodic("flaky", Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("pass blew up".into())
                } else {
                    Ok(())
                }
            }
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(count.load(Ordering::SeqCst) >= 3);

        tasks.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_further_passes() {
        let tasks = BackgroundTasks::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        tasks.spawn_periodic("stopper", Duration::from_secs(1), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        tasks.shutdown().await;
        let after_shutdown = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_shutdown);
    }
}
