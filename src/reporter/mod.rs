//! Reporting module for detected events.
//!
//! This module defines the `EventReporter` trait and provides
//! implementations for different output formats.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use crate::domain::ProtocolEvent;

/// Trait for presenting detected events.
///
/// Reporters only present; capture and classification happen elsewhere.
/// Different implementations can output to console, files, webhooks, etc.
pub trait EventReporter: Send {
    /// Report a detected event.
    fn report(&self, event: &ProtocolEvent);

    /// Called when the listener starts.
    fn on_start(&self, interface: &str);

    /// Called when the listener stops.
    fn on_stop(&self);
}
