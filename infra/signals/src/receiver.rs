use crate::bus::Signal;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::warn;

/// Uniform "wait for the next value" over event and state receivers.
///
/// Event receivers that fell behind skip to the oldest retained value and log
/// how many were lost. State receivers wait for a change and yield the latest.
pub trait SignalReceiverExt<T> {
    /// `None` once the channel is closed.
    fn next_signal(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Signal> SignalReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn next_signal(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;
        loop {
            match self.recv().await {
                Ok(signal) => {
                    if skipped > 0 {
                        warn!(
                            signal = std::any::type_name::<T>(),
                            skipped,
                            "Signal receiver lagged; continuing from oldest retained value"
                        );
                    }
                    return Some(signal);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => skipped = skipped.saturating_add(n),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T: Signal> SignalReceiverExt<T> for watch::Receiver<Arc<T>> {
    async fn next_signal(&mut self) -> Option<Arc<T>> {
        self.changed().await.ok()?;
        Some(Arc::clone(&self.borrow_and_update()))
    }
}
