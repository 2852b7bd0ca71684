use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Floor for a task interval
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// A job run on a fixed interval until stopped.
///
/// The first run happens immediately. Dropping the handle aborts the task,
/// so a view that goes away cannot leave its timer running.
pub struct PeriodicTask {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn `job` every `period` on the current tokio runtime.
    ///
    /// A zero period is raised to `MIN_PERIOD`; the timer cannot tick at zero.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = if period.is_zero() {
            warn!("{} task given a zero interval, using {:?}", name, MIN_PERIOD);
            MIN_PERIOD
        } else {
            period
        };
        let (shutdown, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    _ = interval.tick() => job().await,
                }
            }

            debug!("{} task stopped", name);
        });

        debug!("{} task started (interval: {:?})", name, period);

        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the task and wait for the current run to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("{} task ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(period: Duration) -> (PeriodicTask, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let task = PeriodicTask::spawn("counter", period, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        (task, runs)
    }

    #[tokio::test]
    async fn test_runs_immediately_and_repeats() {
        let (task, runs) = counting_task(Duration::from_millis(10));

        time::sleep(Duration::from_millis(55)).await;
        assert!(task.is_running());
        assert!(runs.load(Ordering::SeqCst) >= 2);

        task.stop().await;
    }

    #[tokio::test]
    async fn test_stop_ends_the_task() {
        let (task, runs) = counting_task(Duration::from_millis(5));
        time::sleep(Duration::from_millis(20)).await;
        task.stop().await;

        let after_stop = runs.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_zero_period_keeps_running() {
        let (task, runs) = counting_task(Duration::ZERO);

        time::sleep(Duration::from_millis(20)).await;
        assert!(task.is_running());
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        task.stop().await;
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let (task, runs) = counting_task(Duration::from_millis(5));
        time::sleep(Duration::from_millis(20)).await;
        drop(task);

        // Let the abort land before sampling
        time::sleep(Duration::from_millis(5)).await;
        let after_drop = runs.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_drop);
    }
}
