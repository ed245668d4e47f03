use log::debug;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, sleep};

/// Quiet period before a filter change reaches the data orchestrator.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(150);
/// Quiet period before a typed search query is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer.
///
/// Every pushed value restarts the window; the latest value is forwarded to
/// `settled` once nothing new has arrived for a full window. Dropping the
/// debouncer cancels any pending emission.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Debug + Send + 'static> Debouncer<T> {
    pub fn spawn(window: Duration, settled: mpsc::Sender<T>) -> Self {
        let (input, inputs) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(window, inputs, settled));
        Self { input, task }
    }

    pub fn push(&self, value: T) {
        let _ = self.input.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T: Debug>(
    window: Duration,
    mut inputs: mpsc::UnboundedReceiver<T>,
    settled: mpsc::Sender<T>,
) {
    let mut pending: Option<T> = None;
    let timer = sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            received = inputs.recv() => {
                let Some(value) = received else {
                    break;
                };
                pending = Some(value);
                timer.as_mut().reset(Instant::now() + window);
            }
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    debug!("debounce settled: {value:?}");
                    if settled.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rapid_updates_settle_once_on_the_last_value() {
        let (tx, mut rx) = mpsc::channel(8);
        let debouncer = Debouncer::spawn(FILTER_DEBOUNCE, tx);

        for value in 1..=5 {
            debouncer.push(value);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(FILTER_DEBOUNCE * 2).await;

        assert_eq!(rx.recv().await, Some(5));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_emitted_before_the_window_closes() {
        let (tx, mut rx) = mpsc::channel(8);
        let debouncer = Debouncer::spawn(FILTER_DEBOUNCE, tx);

        debouncer.push("season");
        tokio::time::sleep(FILTER_DEBOUNCE - Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(rx.try_recv().ok(), Some("season"));
    }

    #[tokio::test(start_paused = true)]
    async fn separated_updates_settle_individually() {
        let (tx, mut rx) = mpsc::channel(8);
        let debouncer = Debouncer::spawn(SEARCH_DEBOUNCE, tx);

        debouncer.push("ph");
        tokio::time::sleep(SEARCH_DEBOUNCE * 2).await;
        debouncer.push("phelps");
        tokio::time::sleep(SEARCH_DEBOUNCE * 2).await;

        assert_eq!(rx.recv().await, Some("ph"));
        assert_eq!(rx.recv().await, Some("phelps"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_cancels_the_pending_emission() {
        let (tx, mut rx) = mpsc::channel(8);
        let debouncer = Debouncer::spawn(FILTER_DEBOUNCE, tx);

        debouncer.push(1);
        drop(debouncer);
        tokio::time::sleep(FILTER_DEBOUNCE * 2).await;

        assert_eq!(rx.recv().await, None);
    }
}
