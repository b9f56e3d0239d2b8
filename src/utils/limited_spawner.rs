use std::future::Future;
use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore};
use tokio::task::JoinHandle;

/// Spawns tokio tasks with at most `max_in_flight` of them running at once.
///
/// `spawn` waits for a free slot before the task starts; the slot is given
/// back when the task finishes, panics included.
pub struct LimitedSpawner {
    semaphore: Arc<Semaphore>,
    max_in_flight: usize,
}

impl LimitedSpawner {
    /// A limit of zero would never make progress and is raised to one.
    pub fn new(max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub async fn spawn<F>(&self, f: F) -> Result<JoinHandle<F::Output>, AcquireError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(tokio::spawn(async move {
            let _permit = permit;
            f.await
        }))
    }
}
