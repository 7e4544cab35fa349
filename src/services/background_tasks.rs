use async_lock::Semaphore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs detached tasks that outlive the request which started them.
///
/// At most `limit` tasks run at once; anything submitted beyond that is dropped.
/// Each task is abandoned once its own timeout elapses.
pub(crate) struct BackgroundTasks {
    permits: Arc<Semaphore>,
    task_timeout: Duration,
}

impl BackgroundTasks {
    pub(crate) fn new(limit: usize, task_timeout: Duration) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            task_timeout,
        }
    }

    /// Returns `false` when the pool is saturated and the task was dropped.
    pub(crate) fn spawn<F>(&self, label: &str, task: F) -> bool
    where
        F: Future<Output = ()> + 'static,
    {
        let permit = match self.permits.try_acquire_arc() {
            Some(permit) => permit,
            None => {
                warn!(label, "Background task pool is saturated. Dropping task");
                return false;
            }
        };

        let label = label.to_string();
        let task_timeout = self.task_timeout;

        actix_rt::spawn(async move {
            debug!(%label, "Background task started");

            match actix_rt::time::timeout(task_timeout, task).await {
                Ok(()) => debug!(%label, "Background task finished"),
                Err(_) => warn!(%label, ?task_timeout, "Background task timed out"),
            }

            drop(permit);
        });

        true
    }
}
