//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::{default_settings_path, MalformedPolicy, Settings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pulse-stream")]
#[command(about = "Streams a synthetic pulse-oximetry waveform over WebSocket", long_about = None)]
pub struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// WebSocket endpoint path
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Keep connections open when a frame is not a JSON object
    #[arg(long)]
    pub ignore_malformed: bool,

    /// Also send 1 Hz sine/cosine reference signals
    #[arg(long)]
    pub reference_signals: bool,

    /// Write the effective settings to the settings file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_settings_path)
    }

    /// Overlay command-line values onto settings loaded from file
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(path) = &self.path {
            settings.path = if path.starts_with('/') {
                path.clone()
            } else {
                format!("/{}", path)
            };
        }
        if self.ignore_malformed {
            settings.malformed_frames = MalformedPolicy::Ignore;
        }
        if self.reference_signals {
            settings.reference_signals = true;
        }
    }
}
