// src/config.rs

//! Configuration for the demo host and the polling watcher.
//!
//! The library itself reads no files and no environment variables; these
//! structs are filled from an optional JSON file passed to the binary. Every
//! field has a default, so `{}` is a valid configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// How the host learns about resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// SIGWINCH delivered to the registered callback.
    #[default]
    Signal,
    /// Background thread sampling the terminal size.
    Poll,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: WatchMode,
    /// Sampling period of the polling watcher.
    pub poll_interval_ms: u64,
    /// How often the demo loop checks for sizes stored by the signal callback.
    pub report_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: WatchMode::default(),
            poll_interval_ms: 100,
            report_interval_ms: 50,
        }
    }
}

impl Config {
    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("Invalid JSON configuration")?;
        if config.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json("{}").expect("parse failed");
        assert_eq!(config.mode, WatchMode::Signal);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.report_interval(), Duration::from_millis(50));
    }

    #[test]
    fn fields_override_defaults() {
        let config = Config::from_json(r#"{ "mode": "poll", "poll_interval_ms": 250 }"#)
            .expect("parse failed");
        assert_eq!(config.mode, WatchMode::Poll);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.report_interval_ms, 50);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let err = Config::from_json(r#"{ "poll_interval_ms": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Config::from_json(r#"{ "mode": "inotify" }"#).is_err());
    }

    #[test]
    fn load_reads_file_and_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile failed");
        write!(file, r#"{{ "mode": "poll" }}"#).expect("write failed");
        let config = Config::load(file.path()).expect("load failed");
        assert_eq!(config.mode, WatchMode::Poll);

        let missing = file.path().with_extension("missing");
        let err = Config::load(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
