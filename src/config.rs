//! Server configuration.
//!
//! Defaults work out of the box. A YAML file named by `KASTLE_CONFIG` may
//! override any of them, and `KASTLE_HOST` / `KASTLE_PORT` override the
//! listen address on top of that:
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 8080
//! limits:
//!   max_header_bytes: 65536
//!   max_body_bytes: 1048576
//! timeouts:
//!   request_line_ms: 30000
//!   headers_ms: 30000
//!   body_ms: 30000
//!   write_ms: 30000
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub limits: Limits,
    pub timeouts: Timeouts,
}

/// Size limits applied while reading a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Request line plus header block.
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

/// Deadlines for each phase of a connection, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub request_line_ms: u64,
    pub headers_ms: u64,
    pub body_ms: u64,
    pub write_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            limits: Limits::default(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 64 * 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_line_ms: 30_000,
            headers_ms: 30_000,
            body_ms: 30_000,
            write_ms: 30_000,
        }
    }
}

impl Timeouts {
    pub fn request_line(&self) -> Duration {
        Duration::from_millis(self.request_line_ms)
    }

    pub fn headers(&self) -> Duration {
        Duration::from_millis(self.headers_ms)
    }

    pub fn body(&self) -> Duration {
        Duration::from_millis(self.body_ms)
    }

    pub fn write(&self) -> Duration {
        Duration::from_millis(self.write_ms)
    }
}

impl Config {
    /// Loads the configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("KASTLE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = std::env::var("KASTLE_HOST") {
            cfg.host = host;
        }

        if let Ok(port) = std::env::var("KASTLE_PORT") {
            cfg.port = port
                .parse()
                .with_context(|| format!("invalid KASTLE_PORT {:?}", port))?;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}
