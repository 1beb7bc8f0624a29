//! The capture read loop.

use std::io;

use tokio::sync::mpsc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::FrameReceiver;
use crate::classifier::PacketClassifier;
use crate::domain::ProtocolEvent;

/// Why a capture session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A stop was requested
    Stopped,
    /// The capture library reported an unrecoverable error
    ReadFailed(io::ErrorKind),
    /// Nobody is left to receive events
    StreamClosed,
}

/// One live capture: an open handle plus the loop that drains it.
///
/// The handle is released when the session is dropped, which `run` does
/// on every exit path.
pub struct CaptureSession {
    interface: String,
    receiver: Box<dyn FrameReceiver>,
    classifier: PacketClassifier,
    events: mpsc::Sender<ProtocolEvent>,
    stop: oneshot::Receiver<()>,
}

impl CaptureSession {
    pub fn new(
        interface: impl Into<String>,
        receiver: Box<dyn FrameReceiver>,
        events: mpsc::Sender<ProtocolEvent>,
        stop: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            interface: interface.into(),
            receiver,
            classifier: PacketClassifier::new(),
            events,
            stop,
        }
    }

    /// Read, classify and publish frames until stopped.
    ///
    /// Reads block, so a stop is only noticed once the next frame arrives
    /// (or the next read timeout expires, if one was configured). Publishing
    /// blocks while the event stream is full. Must not be called from
    /// within an async runtime.
    pub fn run(mut self) -> SessionEnd {
        info!("Capture started on {}", self.interface);

        let end = loop {
            let frame = match self.receiver.next_frame() {
                Ok(frame) => frame,
                Err(e) if is_transient(&e) => {
                    if stop_requested(&mut self.stop) {
                        break SessionEnd::Stopped;
                    }
                    continue;
                }
                Err(e) => {
                    warn!("Capture on {} failed: {}", self.interface, e);
                    break SessionEnd::ReadFailed(e.kind());
                }
            };

            if stop_requested(&mut self.stop) {
                break SessionEnd::Stopped;
            }

            let Some(event) = self.classifier.classify(frame) else {
                continue;
            };

            debug!(
                "{} request for '{}' from {}",
                event.label, event.requested_name, event.source_ip
            );

            if self.events.blocking_send(event).is_err() {
                debug!("Event stream closed, ending capture on {}", self.interface);
                break SessionEnd::StreamClosed;
            }
        };

        info!("Capture on {} ended: {:?}", self.interface, end);
        end
    }
}

/// Read errors that do not end the session.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

fn stop_requested(stop: &mut oneshot::Receiver<()>) -> bool {
    match stop.try_recv() {
        Ok(()) | Err(TryRecvError::Closed) => true,
        Err(TryRecvError::Empty) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::ScriptedReceiver;
    use crate::domain::ProtocolLabel;
    use crate::testutil::*;
    use std::net::Ipv4Addr;

    const HOST: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 7);

    fn session(
        frames: Vec<Vec<u8>>,
        capacity: usize,
    ) -> (
        CaptureSession,
        mpsc::Receiver<ProtocolEvent>,
        oneshot::Sender<()>,
    ) {
        let (tx, rx) = mpsc::channel(capacity);
        let (stop_tx, stop_rx) = oneshot::channel();
        let receiver = ScriptedReceiver::new(frames).into_boxed();
        (CaptureSession::new("test0", receiver, tx, stop_rx), rx, stop_tx)
    }

    #[test]
    fn test_publishes_matches_in_order() {
        let frames = vec![
            udp_frame(HOST, 50000, 5355, &llmnr_query("alpha")),
            tcp_frame(HOST, 50001, 443, b"\x16\x03\x01"),
            udp_frame(HOST, 5353, 5353, &mdns_query("beta.local")),
        ];
        let (session, mut rx, _stop) = session(frames, 8);

        assert_eq!(
            session.run(),
            SessionEnd::ReadFailed(io::ErrorKind::UnexpectedEof)
        );

        let first = rx.blocking_recv().unwrap();
        assert_eq!(first.label, ProtocolLabel::Llmnr);
        assert_eq!(first.requested_name, "alpha");
        let second = rx.blocking_recv().unwrap();
        assert_eq!(second.label, ProtocolLabel::Mdns);
        assert_eq!(second.requested_name, ".beta.local");
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_stop_checked_before_classifying() {
        let frames = vec![udp_frame(HOST, 50000, 5355, &llmnr_query("alpha"))];
        let (session, mut rx, stop) = session(frames, 8);

        stop.send(()).unwrap();
        assert_eq!(session.run(), SessionEnd::Stopped);
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_dropped_stop_sender_stops() {
        let frames = vec![udp_frame(HOST, 50000, 5355, &llmnr_query("alpha"))];
        let (session, _rx, stop) = session(frames, 8);

        drop(stop);
        assert_eq!(session.run(), SessionEnd::Stopped);
    }

    #[test]
    fn test_transient_errors_skipped() {
        let receiver = ScriptedReceiver::new(vec![udp_frame(HOST, 50000, 5355, &llmnr_query("gamma"))])
            .with_error_first(io::ErrorKind::TimedOut)
            .into_boxed();
        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = oneshot::channel();

        let end = CaptureSession::new("test0", receiver, tx, stop_rx).run();
        assert_eq!(end, SessionEnd::ReadFailed(io::ErrorKind::UnexpectedEof));
        assert_eq!(rx.blocking_recv().unwrap().requested_name, "gamma");
    }

    #[test]
    fn test_stream_closed_ends_session() {
        let frames = vec![udp_frame(HOST, 50000, 5355, &llmnr_query("alpha"))];
        let (session, rx, _stop) = session(frames, 8);

        drop(rx);
        assert_eq!(session.run(), SessionEnd::StreamClosed);
    }

    #[test]
    fn test_handle_released_on_exit() {
        let scripted = ScriptedReceiver::new(Vec::new());
        let released = scripted.released_flag();
        let (tx, _rx) = mpsc::channel(1);
        let (_stop_tx, stop_rx) = oneshot::channel();

        CaptureSession::new("test0", scripted.into_boxed(), tx, stop_rx).run();
        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }
}
