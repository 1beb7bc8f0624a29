//! Consumer side of the event stream.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::domain::ProtocolEvent;

/// Default number of events buffered before the capture loop blocks.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded FIFO of detected events.
///
/// Clones share one underlying queue: every event is delivered to exactly
/// one consumer. All methods return `None` once every producer is gone and
/// the buffer has been drained.
#[derive(Clone)]
pub struct EventStream {
    inner: Arc<Mutex<mpsc::Receiver<ProtocolEvent>>>,
}

impl EventStream {
    pub(crate) fn new(rx: mpsc::Receiver<ProtocolEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rx)),
        }
    }

    /// Wait for the next event.
    pub async fn recv(&self) -> Option<ProtocolEvent> {
        self.inner.lock().await.recv().await
    }

    /// Wait for the next event, blocking the current thread.
    ///
    /// Panics if called from within an async runtime.
    pub fn blocking_recv(&self) -> Option<ProtocolEvent> {
        self.inner.blocking_lock().blocking_recv()
    }

    /// Take the next event if one is ready, without waiting.
    pub fn try_recv(&self) -> Option<ProtocolEvent> {
        self.inner.try_lock().ok()?.try_recv().ok()
    }
}
