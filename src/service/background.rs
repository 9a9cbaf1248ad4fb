use std::fmt::Display;
use std::future::Future;

use tokio_util::task::TaskTracker;
use tracing::Instrument as _;

/// Runs work nobody waits for. Failures are logged and otherwise dropped;
/// only a shutdown waits for what is still running.
#[derive(Debug, Clone, Default)]
pub struct Background {
    tasks: TaskTracker,
}

impl Background {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F, E>(&self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let span = tracing::info_span!("background", task = name);

        self.tasks.spawn(
            async move {
                if let Err(error) = future.await {
                    tracing::warn!(%error, "background task failed");
                }
            }
            .instrument(span),
        );
    }

    /// Waits until every task spawned so far has finished.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}
