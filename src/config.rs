use std::path::Path;
use std::time::Duration;

use crate::capture::{CaptureOptions, SNAPSHOT_LEN};
use crate::error::ConfigError;
use crate::stream::DEFAULT_CAPACITY;

const DEFAULT_CONFIG_PATH: &str = "/etc/heimdall.conf";

/// Settings for a `Listener`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Interface to listen on when none is given explicitly
    pub interface: Option<String>,
    /// Events buffered before the capture loop blocks
    pub channel_capacity: usize,
    /// Read timeout for the capture handle; `None` blocks indefinitely
    pub read_timeout: Option<Duration>,
    pub promiscuous: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            interface: None,
            channel_capacity: DEFAULT_CAPACITY,
            read_timeout: None,
            promiscuous: true,
        }
    }
}

impl ListenerConfig {
    /// Load configuration from the config file and environment.
    ///
    /// The file path comes from `HEIMDALL_CONFIG` (default
    /// `/etc/heimdall.conf`) and is skipped if missing. `HEIMDALL_INTERFACE`,
    /// `HEIMDALL_CHANNEL_CAPACITY` and `HEIMDALL_READ_TIMEOUT_MS` override
    /// the file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HEIMDALL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_str_contents(&content)?
        } else {
            Self::default()
        };

        // Allow environment variable overrides
        if let Ok(val) = std::env::var("HEIMDALL_INTERFACE") {
            config.apply("interface", &val)?;
        }
        if let Ok(val) = std::env::var("HEIMDALL_CHANNEL_CAPACITY") {
            config.apply("channel_capacity", &val)?;
        }
        if let Ok(val) = std::env::var("HEIMDALL_READ_TIMEOUT_MS") {
            config.apply("read_timeout_ms", &val)?;
        }

        Ok(config)
    }

    /// Parse `key = value` lines. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored.
    pub fn from_str_contents(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config.apply(key.trim(), value.trim())?;
            }
        }

        Ok(config)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "interface" => {
                self.interface = (!value.is_empty()).then(|| value.to_string());
            }
            "channel_capacity" => {
                let capacity: usize = value.parse().map_err(|_| invalid())?;
                if capacity == 0 {
                    return Err(invalid());
                }
                self.channel_capacity = capacity;
            }
            "read_timeout_ms" => {
                let ms: u64 = value.parse().map_err(|_| invalid())?;
                self.read_timeout = (ms > 0).then(|| Duration::from_millis(ms));
            }
            "promiscuous" => {
                self.promiscuous = value.parse().map_err(|_| invalid())?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Capture options derived from this configuration.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            promiscuous: self.promiscuous,
            read_timeout: self.read_timeout,
            buffer_size: SNAPSHOT_LEN,
        }
    }
}
