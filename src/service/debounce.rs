use std::future::Future;
use std::time::Duration;

use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

struct Task {
    handle: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl Task {
    fn stop(self) {
        // the task may already be done, nobody to tell then
        let _ = self.stop.send(());
    }
}

/// Holds at most one scheduled task. Scheduling another one cancels the
/// previous one if it has not fired yet, and so does dropping the slot.
#[derive(Default)]
pub struct TaskSlot {
    current: Option<Task>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, f: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let deadline = Instant::now() + delay;
        let (stop, mut signal) = oneshot::channel();
        let handle = tokio::spawn(async move {
            select! {
                biased;

                _ = &mut signal => {}
                _ = sleep_until(deadline) => f.await,
            }
        });

        self.current = Some(Task { handle, stop });
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.current.take() {
            task.stop();
        }
    }

    /// Whether a scheduled task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Passes a value on only once no newer one arrived for `delay`.
pub struct Debouncer<T> {
    delay: Duration,
    slot: TaskSlot,
    output: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Returns the debouncer and the receiving end of the settled values.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (output, settled) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            slot: TaskSlot::new(),
            output,
        };

        (debouncer, settled)
    }

    /// Restarts the wait with `value` as the one to emit.
    pub fn push(&mut self, value: T) {
        let output = self.output.clone();
        self.slot.schedule(self.delay, async move {
            // receiver gone means nobody listens anymore
            let _ = output.send(value);
        });
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }
}
