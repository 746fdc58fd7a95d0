// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for `humid`.
//!
//! Failures fall into three groups: loading the preset file, talking to the
//! Hue bridge, and reading input events. None of them ever crosses the
//! handoff between the coordinator and the delivery worker; delivery
//! failures are logged by the worker and dropped.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The preset file could not be loaded.
    #[error("preset error: {0}")]
    Preset(#[from] PresetError),

    /// Communication with the Hue bridge failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An input event could not be read or decoded.
    #[error("input error: {0}")]
    Input(#[from] InputError),
}

/// Errors raised while loading the preset file.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The file could not be read.
    #[error("unable to open presets file {}: {source}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file is not a valid preset document.
    #[error("unable to parse presets file {}: {source}", .path.display())]
    Json {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying JSON failure.
        source: serde_json::Error,
    },
}

/// Errors related to the Hue bridge HTTP API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with a non-success status code.
    #[error("HTTP {0} - {1}")]
    Status(u16, String),

    /// The bridge accepted the request but reported an error for it.
    #[error("bridge error {error_type} at {address}: {description}")]
    Api {
        /// Hue error type number.
        error_type: i32,
        /// Resource address the error refers to.
        address: String,
        /// Human readable description from the bridge.
        description: String,
    },

    /// Registration was refused because the link button was not pressed.
    #[error("link button not pressed, press the button on the Hue bridge and retry")]
    LinkButtonNotPressed,

    /// The bridge response did not have the expected shape.
    #[error("unexpected bridge response: {0}")]
    UnexpectedResponse(String),
}

/// Errors related to input events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The event keyword is not one of `on`, `off` or `cc`.
    #[error("unknown event kind: {0}")]
    UnknownCommand(String),

    /// The event line is missing an argument.
    #[error("missing {0} argument")]
    MissingArgument(&'static str),

    /// An argument could not be parsed as a MIDI data byte.
    #[error("invalid {field}: {value}")]
    InvalidNumber {
        /// Which argument failed.
        field: &'static str,
        /// The raw text.
        value: String,
    },

    /// The event line has trailing arguments.
    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),

    /// The MIDI subsystem could not be initialised.
    #[error("MIDI initialisation failed: {0}")]
    MidiInit(String),

    /// No MIDI input port is available or matches the requested name.
    #[error("no MIDI input port matching {0:?}")]
    NoMidiPort(String),

    /// Connecting to the MIDI input port failed.
    #[error("MIDI connection failed: {0}")]
    MidiConnect(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
