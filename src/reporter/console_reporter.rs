//! Console-based event reporter.

use std::io::{self, Write};

use crate::domain::{ProtocolEvent, ProtocolLabel};
use crate::filter::ProtocolFilter;
use crate::reporter::EventReporter;

/// Reports events to the console, one line per detection.
///
/// A lookup for the `wpad` host is printed twice: once under the protocol
/// that carried it and once as a WPAD exposure.
pub struct ConsoleReporter {
    filter: ProtocolFilter,
    /// Whether to show the raw payload
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter.
    pub fn new() -> Self {
        Self {
            filter: ProtocolFilter::All,
            verbose: false,
        }
    }

    /// Only print events passing `filter`.
    pub fn with_filter(mut self, filter: ProtocolFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Column header matching `format_event` output.
    pub fn header() -> String {
        format!("{:<15}  {:<8}  {}", "Source IP", "Protocol", "Requested Hostname")
    }

    fn format_event(&self, event: &ProtocolEvent) -> Vec<String> {
        let mut labels = vec![event.label];
        if event.label != ProtocolLabel::Wpad && event.is_wpad_lookup() {
            labels.push(ProtocolLabel::Wpad);
        }

        labels
            .into_iter()
            .filter(|label| self.filter.shows(*label, event))
            .map(|label| {
                let mut line = format!(
                    "{:<15}  {:<8}  {}",
                    event.source_ip.to_string(),
                    label.as_str(),
                    event.requested_name
                );
                if self.verbose {
                    line.push_str(&format!(" | Raw: {}", event.raw_payload_text.escape_debug()));
                }
                line
            })
            .collect()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventReporter for ConsoleReporter {
    fn report(&self, event: &ProtocolEvent) {
        let mut stdout = io::stdout().lock();
        for line in self.format_event(event) {
            let _ = writeln!(stdout, "{}", line);
        }
    }

    fn on_start(&self, interface: &str) {
        println!("Listening for name-resolution requests on interface: {}", interface);
        println!("Showing: {}. Press Ctrl+C to stop.\n", self.filter);
        println!("{}", Self::header());
    }

    fn on_stop(&self) {
        println!("\nStopping listener.");
    }
}
