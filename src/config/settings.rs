//! Settings structures for websearch-rs configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that cannot be used as configured
    pub fn validate(&self) -> Result<()> {
        self.search.fetch_timeout()?;
        self.outgoing.request_timeout()?;
        Ok(())
    }

    /// Merge with environment variables (WEBSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("WEBSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("WEBSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("WEBSEARCH_LOG_DIR") {
            self.logging.directory = val;
        }
        if let Ok(val) = std::env::var("WEBSEARCH_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("WEBSEARCH_PROXY") {
            self.outgoing.proxies.all = Some(val);
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Result count used when a request does not name one
    pub default_max_results: usize,
    /// Upper bound applied to every requested result count
    pub max_results_cap: usize,
    /// Whole-request timeout in seconds (0 disables it)
    pub timeout: f64,
}

impl SearchSettings {
    /// Timeout wrapped around a single fetch, if any
    pub fn fetch_timeout(&self) -> Result<Option<Duration>> {
        if self.timeout == 0.0 {
            return Ok(None);
        }
        seconds("search.timeout", self.timeout).map(Some)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_max_results: 10,
            max_results_cap: 100,
            timeout: 30.0,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl OutgoingSettings {
    /// Timeout applied to each outgoing request
    pub fn request_timeout(&self) -> Result<Duration> {
        seconds("outgoing.request_timeout", self.request_timeout)
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Log file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory receiving the rotated log files
    pub directory: String,
    /// Log file name prefix
    pub file_prefix: String,
    /// Number of daily files kept on disk
    pub max_files: usize,
    /// Filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "websearch".to_string(),
            max_files: 5,
            level: "info".to_string(),
        }
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| {
        format!(
            "{} must be a finite, non-negative number of seconds, got {}",
            key, value
        )
    })
}
