//! Error types for the capture engine.

use thiserror::Error;

/// Errors raised while opening or managing a capture session.
///
/// Parsing problems never show up here: a frame that cannot be decoded is
/// simply not reported.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("insufficient permissions to capture on '{interface}': {message} (try running as root or with CAP_NET_RAW)")]
    InsufficientPermissions { interface: String, message: String },

    #[error("failed to open capture on '{interface}': {message}")]
    ChannelCreation { interface: String, message: String },

    #[error("unsupported channel type on '{0}'")]
    UnsupportedChannel(String),

    #[error("a capture session is already running")]
    AlreadyRunning,

    #[error("listener has been shut down")]
    ListenerClosed,
}

/// Errors raised while loading the listener configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}
