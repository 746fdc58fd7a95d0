// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `humid` command line entry point.
//!
//! Loads the presets, connects to the bridge and the input source, then runs
//! the dispatcher until the input closes or Ctrl-C is pressed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use humid::dispatch::{Dispatcher, event_channel};
use humid::event::InputEvent;
use humid::preset::{PresetLoadPolicy, PresetTable};
use humid::protocol::BridgeConfig;

/// Drive Philips Hue lights from MIDI notes and controllers.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// IP address of the Philips Hue bridge.
    #[arg(long, default_value = BridgeConfig::DEFAULT_HOST)]
    ip: String,

    /// User name for the Hue bridge.
    #[arg(long, default_value = BridgeConfig::DEFAULT_USERNAME)]
    username: String,

    /// Device type for the Hue bridge.
    #[arg(long = "device_type", default_value = BridgeConfig::DEFAULT_DEVICE_TYPE)]
    device_type: String,

    /// Presets file to use.
    #[arg(long, default_value = "./presets.json")]
    presets: PathBuf,

    /// Register a new user for the device type before starting.
    #[arg(long)]
    register: bool,

    /// Exit instead of running with empty presets when the file cannot be loaded.
    #[arg(long)]
    strict_presets: bool,

    /// Where input events come from.
    #[arg(long, value_enum, default_value_t = InputKind::default())]
    input: InputKind,

    /// Use the first MIDI input port whose name contains this text.
    #[arg(long)]
    midi_port: Option<String>,

    /// Give up on a bridge request after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputKind {
    /// A MIDI input port.
    Midi,
    /// Text events on standard input, one per line.
    Stdin,
}

impl Default for InputKind {
    fn default() -> Self {
        if cfg!(feature = "midi") {
            Self::Midi
        } else {
            Self::Stdin
        }
    }
}

/// Keeps the input source alive.
enum InputHandle {
    Stdin(JoinHandle<()>),
    #[cfg(feature = "midi")]
    Midi(humid::event::source::MidiListener),
}

impl Args {
    fn preset_policy(&self) -> PresetLoadPolicy {
        if self.strict_presets {
            PresetLoadPolicy::Abort
        } else {
            PresetLoadPolicy::Continue
        }
    }

    fn bridge_config(&self) -> BridgeConfig {
        let config = BridgeConfig::new(&self.ip)
            .with_username(&self.username)
            .with_device_type(&self.device_type);
        match self.timeout_ms {
            Some(ms) => config.with_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn start_input(args: &Args, tx: mpsc::Sender<InputEvent>) -> Result<InputHandle> {
    match args.input {
        InputKind::Stdin => {
            tracing::info!("Reading events from standard input");
            Ok(InputHandle::Stdin(humid::event::source::spawn_stdin_source(tx)))
        }
        #[cfg(feature = "midi")]
        InputKind::Midi => {
            let listener =
                humid::event::source::MidiListener::connect(args.midi_port.as_deref(), tx)
                    .context("opening MIDI input")?;
            Ok(InputHandle::Midi(listener))
        }
        #[cfg(not(feature = "midi"))]
        InputKind::Midi => {
            drop(tx);
            anyhow::bail!(
                "MIDI input{} requested but humid was built without the `midi` feature; \
                 use --input stdin",
                args.midi_port
                    .as_deref()
                    .map(|port| format!(" from {port:?}"))
                    .unwrap_or_default()
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let presets = PresetTable::load_with_policy(&args.presets, args.preset_policy())
        .context("loading presets")?;

    let mut client = args.bridge_config().into_client()?;
    if args.register {
        let username = client
            .register()
            .await
            .context("registering with the Hue bridge")?;
        tracing::info!(username = %username, "Registered new bridge user");
        client = client.with_username(username);
    }

    let (events_tx, events_rx) = event_channel();
    let input = start_input(&args, events_tx)?;

    tracing::info!(bridge = %client.base_url(), "Dispatching light updates");
    let dispatcher = Dispatcher::new(Arc::new(presets), client);

    tokio::select! {
        stats = dispatcher.run(events_rx) => {
            tracing::info!(
                delivered = stats.delivered,
                failed = stats.failed,
                "Input closed, all updates handed off"
            );
        }
        result = tokio::signal::ctrl_c() => {
            result.context("waiting for Ctrl-C")?;
            tracing::info!("Interrupted, shutting down");
        }
    }

    match input {
        InputHandle::Stdin(handle) => handle.abort(),
        #[cfg(feature = "midi")]
        InputHandle::Midi(listener) => {
            tracing::debug!(port = listener.port_name(), "Closing MIDI input");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_flags() {
        let args = Args::try_parse_from(["humid"]).unwrap();
        assert_eq!(args.ip, "192.168.1.3");
        assert_eq!(args.username, "HueGoRaspberryPiUser");
        assert_eq!(args.device_type, "HueGoRaspberryPi");
        assert_eq!(args.presets, PathBuf::from("./presets.json"));
        assert!(!args.register);
        assert_eq!(args.preset_policy(), PresetLoadPolicy::Continue);
        assert_eq!(args.bridge_config().timeout(), None);
    }

    #[test]
    fn parses_all_flags() {
        let args = Args::try_parse_from([
            "humid",
            "--ip",
            "10.0.0.7",
            "--username",
            "me",
            "--device_type",
            "stage",
            "--presets",
            "/etc/humid.json",
            "--strict-presets",
            "--input",
            "stdin",
            "--timeout-ms",
            "1500",
        ])
        .unwrap();

        assert_eq!(args.input, InputKind::Stdin);
        assert_eq!(args.preset_policy(), PresetLoadPolicy::Abort);

        let config = args.bridge_config();
        assert_eq!(config.base_url(), "http://10.0.0.7");
        assert_eq!(config.username(), "me");
        assert_eq!(config.device_type(), "stage");
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_subcommands() {
        assert!(Args::try_parse_from(["humid", "apply"]).is_err());
    }
}
