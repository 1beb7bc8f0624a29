//! Scripted capture backend for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::{CaptureOptions, FrameReceiver, PacketCapture};
use crate::error::CaptureError;

/// Replays a fixed script of frames, then optionally waits on a live feed.
///
/// Once both are exhausted every read fails with `UnexpectedEof`.
pub struct ScriptedReceiver {
    script: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
    feed: Option<mpsc::UnboundedReceiver<Vec<u8>>>,
    current: Vec<u8>,
    released: Arc<AtomicBool>,
}

impl ScriptedReceiver {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            script: frames.into_iter().map(Ok).collect(),
            feed: None,
            current: Vec::new(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A receiver that blocks until the test pushes a frame.
    pub fn live() -> (Self, mpsc::UnboundedSender<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut receiver = Self::new(Vec::new());
        receiver.feed = Some(rx);
        (receiver, tx)
    }

    pub fn with_error_first(mut self, kind: io::ErrorKind) -> Self {
        self.script.push_front(Err(kind));
        self
    }

    /// Set once the receiver has been dropped.
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }

    pub fn into_boxed(self) -> Box<dyn FrameReceiver> {
        Box::new(self)
    }
}

impl FrameReceiver for ScriptedReceiver {
    fn next_frame(&mut self) -> io::Result<&[u8]> {
        let next = match self.script.pop_front() {
            Some(item) => item,
            None => match self.feed.as_mut().and_then(|feed| feed.blocking_recv()) {
                Some(frame) => Ok(frame),
                None => Err(io::ErrorKind::UnexpectedEof),
            },
        };

        match next {
            Ok(frame) => {
                self.current = frame;
                Ok(&self.current)
            }
            Err(kind) => Err(io::Error::from(kind)),
        }
    }
}

impl Drop for ScriptedReceiver {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Hands out prepared receivers in order; fails once they run out.
#[derive(Default)]
pub struct ScriptedCapture {
    receivers: Mutex<VecDeque<ScriptedReceiver>>,
    opened: Mutex<Vec<(String, CaptureOptions)>>,
}

impl ScriptedCapture {
    pub fn new(receivers: Vec<ScriptedReceiver>) -> Self {
        Self {
            receivers: Mutex::new(receivers.into()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Interfaces and options passed to `open`, in call order.
    pub fn opened(&self) -> Vec<(String, CaptureOptions)> {
        self.opened.lock().unwrap().clone()
    }
}

impl PacketCapture for ScriptedCapture {
    fn open(
        &self,
        interface: &str,
        options: &CaptureOptions,
    ) -> Result<Box<dyn FrameReceiver>, CaptureError> {
        self.opened
            .lock()
            .unwrap()
            .push((interface.to_string(), options.clone()));

        self.receivers
            .lock()
            .unwrap()
            .pop_front()
            .map(ScriptedReceiver::into_boxed)
            .ok_or_else(|| CaptureError::InterfaceNotFound(interface.to_string()))
    }
}
