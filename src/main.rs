//! pulse-stream - synthetic pulse-oximetry waveform server
//!
//! Clients connect over WebSocket and send
//! `{"command": "start_data_stream"}` to receive ~20 samples per second:
//!
//! ```text
//! {"time_stamp": 1.05, "pulse_oximetry": 0.42, "oximeter": 97.3}
//! ```
//!
//! `oximeter` appears at most once per second. `stop_data_stream` pauses
//! the flow. Every connection gets its own independent session.

use clap::Parser;

mod cli;
mod error;
mod server;
mod settings;
mod signal;
mod stream;

use cli::Args;
use error::Result;
use server::Server;
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting pulse-stream");

    let args = Args::parse();
    let settings_path = args.settings_path();
    let mut settings = Settings::load(&settings_path);
    args.apply(&mut settings);

    if args.write_config {
        return settings.save(&settings_path);
    }

    let server = Server::bind(settings).await?;
    server.run().await
}
