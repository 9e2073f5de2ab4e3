use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Bounded fan-out: runs every task with at most `max_in_flight` running at once
/// and hands back exactly one slot per task.
pub struct ConcurrentProbe {
    semaphore: Arc<Semaphore>,
    completed: Arc<AtomicUsize>,
    errors: Arc<AtomicUsize>,
}

impl ConcurrentProbe {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            completed: Arc::new(AtomicUsize::new(0)),
            errors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Execute all tasks; a slot is `None` when its task panicked or was cancelled.
    /// Result order follows completion, not submission.
    pub async fn execute<T, F, Fut>(&self, tasks: Vec<T>, task_fn: F) -> Vec<Option<Fut::Output>>
    where
        F: Fn(T) -> Fut + Clone + Send + 'static,
        Fut: std::future::Future + Send + 'static,
        Fut::Output: Send + 'static,
        T: Send + 'static,
    {
        let mut futures = FuturesUnordered::new();

        for task in tasks {
            let semaphore = self.semaphore.clone();
            let task_fn = task_fn.clone();
            let completed = self.completed.clone();

            futures.push(tokio::spawn(async move {
                // the semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok()?;
                let result = task_fn(task).await;
                completed.fetch_add(1, Ordering::Relaxed);
                Some(result)
            }));
        }

        let mut results = Vec::with_capacity(futures.len());
        while let Some(joined) = futures.next().await {
            match joined {
                Ok(output) => results.push(output),
                Err(e) => {
                    tracing::warn!(error = %e, "probe task failed");
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    results.push(None);
                }
            }
        }

        results
    }

    /// (completed, failed) task counts so far
    pub fn get_stats(&self) -> (usize, usize) {
        (self.completed.load(Ordering::Relaxed), self.errors.load(Ordering::Relaxed))
    }
}
