//! Session lifecycle management.
//!
//! A `Listener` produces the event stream and owns at most one active
//! capture session. `start` runs a session to completion on the calling thread;
//! `stop` may be called from any other thread to end it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use crate::capture::{CaptureOptions, CaptureSession, PacketCapture, PnetCapture, SessionEnd};
use crate::config::ListenerConfig;
use crate::domain::ProtocolEvent;
use crate::error::CaptureError;
use crate::stream::EventStream;

/// Lifecycle state of the listener's current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    Listening,
    Stopping,
}

struct ActiveSession {
    id: u64,
    interface: String,
    state: SessionState,
    stop: Option<oneshot::Sender<()>>,
}

struct Slot {
    next_id: u64,
    active: Option<ActiveSession>,
    events: Option<mpsc::Sender<ProtocolEvent>>,
}

/// Starts and stops capture sessions, one at a time.
pub struct Listener {
    capture: Arc<dyn PacketCapture>,
    options: CaptureOptions,
    slot: Mutex<Slot>,
    events: Mutex<Option<EventStream>>,
}

impl Listener {
    /// Create a listener on the given capture backend.
    pub fn new(capture: impl PacketCapture + 'static, config: &ListenerConfig) -> Self {
        Self::with_backend(Arc::new(capture), config)
    }

    fn with_backend(capture: Arc<dyn PacketCapture>, config: &ListenerConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));

        Self {
            capture,
            options: config.capture_options(),
            slot: Mutex::new(Slot {
                next_id: 0,
                active: None,
                events: Some(tx),
            }),
            events: Mutex::new(Some(EventStream::new(rx))),
        }
    }

    /// Create a listener capturing live traffic through pnet.
    pub fn with_pnet(config: &ListenerConfig) -> Self {
        Self::new(PnetCapture::new(), config)
    }

    /// Take the consumer handle for detected events.
    ///
    /// Returns `None` after the first call; clone the handle for more
    /// consumers. Once every handle is dropped the running session ends
    /// with `SessionEnd::StreamClosed`.
    pub fn take_events(&self) -> Option<EventStream> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn state(&self) -> SessionState {
        self.lock_slot()
            .active
            .as_ref()
            .map_or(SessionState::Idle, |active| active.state)
    }

    /// Interface of the current session, if any.
    pub fn active_interface(&self) -> Option<String> {
        self.lock_slot()
            .active
            .as_ref()
            .map(|active| active.interface.clone())
    }

    /// Capture on `interface` until stopped.
    ///
    /// Blocks for the whole session, so callers run it on a dedicated thread
    /// (see `spawn`). Fails with `AlreadyRunning` while another session
    /// holds the slot, including one whose stop is still pending, and with
    /// the open error if the capture cannot be opened.
    pub fn start(&self, interface: &str) -> Result<SessionEnd, CaptureError> {
        let (id, stop_rx, events) = self.claim(interface)?;

        info!("Opening capture on {}", interface);
        let receiver = match self.capture.open(interface, &self.options) {
            Ok(receiver) => receiver,
            Err(e) => {
                error!("Error opening interface {}: {}", interface, e);
                self.release(id);
                return Err(e);
            }
        };

        {
            let mut slot = self.lock_slot();
            if let Some(active) = slot.active.as_mut().filter(|active| active.id == id) {
                if active.state == SessionState::Opening {
                    active.state = SessionState::Listening;
                }
            }
        }

        let end = CaptureSession::new(interface, receiver, events, stop_rx).run();
        self.release(id);
        Ok(end)
    }

    /// Run `start` on a new worker thread.
    pub fn spawn(
        self: &Arc<Self>,
        interface: impl Into<String>,
    ) -> JoinHandle<Result<SessionEnd, CaptureError>> {
        let listener = Arc::clone(self);
        let interface = interface.into();
        thread::spawn(move || listener.start(&interface))
    }

    /// Ask the current session to stop.
    ///
    /// A no-op when idle or when a stop is already pending. The session
    /// notices the request after its next read returns.
    pub fn stop(&self) {
        let mut slot = self.lock_slot();
        let Some(active) = slot.active.as_mut() else {
            return;
        };

        if matches!(active.state, SessionState::Opening | SessionState::Listening) {
            if let Some(stop) = active.stop.take() {
                let _ = stop.send(());
            }
            active.state = SessionState::Stopping;
            info!("Stop requested for capture on {}", active.interface);
        }
    }

    /// Stop any session and refuse new ones.
    ///
    /// The event stream closes once the last running session has exited
    /// and its buffered events have been consumed.
    pub fn shutdown(&self) {
        self.stop();
        self.lock_slot().events = None;
    }

    fn claim(
        &self,
        interface: &str,
    ) -> Result<(u64, oneshot::Receiver<()>, mpsc::Sender<ProtocolEvent>), CaptureError> {
        let mut slot = self.lock_slot();

        // A Stopping session still holds its handle until its next read
        if slot.active.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        let events = slot.events.clone().ok_or(CaptureError::ListenerClosed)?;
        let (stop_tx, stop_rx) = oneshot::channel();

        let id = slot.next_id;
        slot.next_id += 1;
        slot.active = Some(ActiveSession {
            id,
            interface: interface.to_string(),
            state: SessionState::Opening,
            stop: Some(stop_tx),
        });

        Ok((id, stop_rx, events))
    }

    /// Clear the slot, but only if it still belongs to session `id`.
    fn release(&self, id: u64) {
        let mut slot = self.lock_slot();
        if slot.active.as_ref().is_some_and(|active| active.id == id) {
            slot.active = None;
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
