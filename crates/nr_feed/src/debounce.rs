//! Trailing-edge debouncing of a rapidly changing value.
//!
//! Values pushed into a [`Debouncer`] only reach its receiver after `delay`
//! has passed without another push. A burst of pushes therefore produces a
//! single update carrying the last value of the burst.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(500);

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Send + Sync + 'static,
{
    /// Start a debouncer whose output initially holds `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> (Self, watch::Receiver<T>) {
        let (input, rx) = mpsc::unbounded_channel();
        let (output, delayed) = watch::channel(initial);
        let task = tokio::spawn(run(rx, output, delay));
        (Self { input, task }, delayed)
    }

    /// Feed the next value, superseding any value still waiting.
    pub fn push(&self, value: T) {
        // The task only stops once `self` is dropped.
        let _ = self.input.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(mut input: mpsc::UnboundedReceiver<T>, output: watch::Sender<T>, delay: Duration) {
    let mut pending: Option<(T, Instant)> = None;
    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        tokio::select! {
            next = input.recv() => match next {
                Some(value) => pending = Some((value, Instant::now() + delay)),
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((value, _)) = pending.take() {
                    if output.send(value).is_err() {
                        debug!("Debounced value has no receivers left");
                        break;
                    }
                }
            }
        }
    }
}
