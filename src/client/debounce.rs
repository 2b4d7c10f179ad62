use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub generation: u64,
    pub value: T,
}

/// A timer can fire just before being superseded, so check [`Debouncer::is_current`] on receipt.
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Settled<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<Settled<T>>) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
            tx,
        }
    }

    pub fn schedule(&mut self, value: T) {
        self.cancel();
        self.generation += 1;

        let settled = Settled {
            generation: self.generation,
            value,
        };
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(settled);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_current(&self, settled: &Settled<T>) -> bool {
        settled.generation == self.generation
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
