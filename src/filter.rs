//! Protocol selection for displayed events.

use std::fmt;
use std::str::FromStr;

use crate::domain::{ProtocolEvent, ProtocolLabel, UnknownProtocol};

/// Which events a consumer wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolFilter {
    #[default]
    All,
    Only(ProtocolLabel),
}

impl ProtocolFilter {
    /// Filter choices offered to users.
    pub fn choices() -> Vec<ProtocolFilter> {
        std::iter::once(Self::All)
            .chain(ProtocolLabel::REPORTABLE.into_iter().map(Self::Only))
            .collect()
    }

    /// Whether `event` passes the filter.
    ///
    /// `WPAD` also matches name lookups for the `wpad` host, whatever
    /// protocol carried them.
    pub fn matches(&self, event: &ProtocolEvent) -> bool {
        self.shows(event.label, event)
    }

    /// Whether `event`, displayed under `label`, passes the filter.
    ///
    /// A `wpad` host lookup is displayed both under its own protocol and
    /// under `WPAD`. The `WPAD` filter keeps every row of such an event.
    pub fn shows(&self, label: ProtocolLabel, event: &ProtocolEvent) -> bool {
        match self {
            Self::All => true,
            Self::Only(ProtocolLabel::Wpad) => event.is_wpad_lookup(),
            Self::Only(selected) => label == *selected,
        }
    }
}

impl fmt::Display for ProtocolFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(label) => label.fmt(f),
        }
    }
}

impl FromStr for ProtocolFilter {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let label: ProtocolLabel = s.parse()?;
        if !label.is_reportable() {
            return Err(UnknownProtocol(s.to_string()));
        }
        Ok(Self::Only(label))
    }
}
