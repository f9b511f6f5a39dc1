use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamError};
use crate::signal::PpgParams;

/// Returns the default settings path: `~/.config/pulse-stream/settings.json`
pub fn default_settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("pulse-stream");
    path.push("settings.json");
    path
}

/// What to do with an inbound frame that is not a JSON object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Close the connection
    #[default]
    Close,
    /// Log it and keep reading
    Ignore,
}

/// Persisted server settings.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Listener
    pub host: String,
    pub port: u16,
    pub path: String,

    // Timing
    pub tick_interval_ms: u64,
    pub oximeter_interval_ms: u64,

    // Waveform
    pub heart_rate: f64,
    pub amplitude: f64,
    pub reference_signals: bool,

    // Control channel
    pub malformed_frames: MalformedPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            path: "/ws".to_string(),

            tick_interval_ms: 50,
            oximeter_interval_ms: 1000,

            heart_rate: 72.0,
            amplitude: 1.0,
            reference_signals: false,

            malformed_frames: MalformedPolicy::Close,
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let fail = |reason: String| StreamError::Settings {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| fail(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| fail(e.to_string()))?;

        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Address string for the listener, e.g. `0.0.0.0:8000`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public URL clients should connect to
    pub fn endpoint_url(&self, addr: SocketAddr) -> String {
        format!("ws://{}{}", addr, self.path)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn oximeter_interval(&self) -> Duration {
        Duration::from_millis(self.oximeter_interval_ms)
    }

    pub fn ppg(&self) -> PpgParams {
        PpgParams::new(self.heart_rate, self.amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pulse-stream-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
        assert_eq!(settings.tick_interval(), Duration::from_millis(50));
        assert_eq!(settings.oximeter_interval(), Duration::from_secs(1));
        assert_eq!(settings.ppg(), PpgParams::default());
        assert_eq!(settings.malformed_frames, MalformedPolicy::Close);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"port": 9001, "malformed_frames": "ignore"}"#).unwrap();
        assert_eq!(settings.port, 9001);
        assert_eq!(settings.malformed_frames, MalformedPolicy::Ignore);
        assert_eq!(settings.path, "/ws");
        assert_eq!(settings.heart_rate, 72.0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let settings = Settings {
            port: 8123,
            reference_signals: true,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_broken_file_falls_back() {
        assert_eq!(Settings::load(&temp_path("missing.json")), Settings::default());

        let path = temp_path("broken.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_endpoint_url() {
        let settings = Settings::default();
        let addr: SocketAddr = "127.0.0.1:8000".parse().unwrap();
        assert_eq!(settings.endpoint_url(addr), "ws://127.0.0.1:8000/ws");
    }
}
