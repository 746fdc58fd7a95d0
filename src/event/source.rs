// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Producers feeding [`InputEvent`]s into the coordinator's channel.
//!
//! Both sources stop on their own once the receiving side is dropped.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::InputEvent;

/// Reads text events from `reader` and forwards them to `tx`.
///
/// One event per line in the [`InputEvent`] text syntax. Blank lines and
/// lines starting with `#` are skipped; malformed lines are logged and
/// skipped. Returns when the reader hits end of input or the channel is
/// closed.
pub async fn forward_lines<R>(reader: R, tx: mpsc::Sender<InputEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input line");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<InputEvent>() {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    tracing::debug!("Input channel closed, stopping line source");
                    break;
                }
            }
            Err(e) => tracing::warn!(line, error = %e, "Ignoring malformed input line"),
        }
    }
}

/// Spawns a task forwarding events typed on standard input.
#[must_use]
pub fn spawn_stdin_source(tx: mpsc::Sender<InputEvent>) -> JoinHandle<()> {
    tokio::spawn(forward_lines(BufReader::new(tokio::io::stdin()), tx))
}

#[cfg(feature = "midi")]
pub use midi::MidiListener;

#[cfg(feature = "midi")]
mod midi {
    use midir::{Ignore, MidiInput, MidiInputConnection};
    use tokio::sync::mpsc;

    use crate::error::InputError;
    use crate::event::{InputEvent, decode_midi};

    const CLIENT_NAME: &str = "humid";

    /// Live connection to a MIDI input port.
    ///
    /// Incoming messages are decoded on midir's callback thread and pushed
    /// into the channel, blocking that thread until the coordinator takes
    /// them. The port is closed when the listener is dropped.
    pub struct MidiListener {
        port_name: String,
        _connection: MidiInputConnection<()>,
    }

    impl MidiListener {
        /// Connects to the first input port whose name contains
        /// `port_filter`, or to the first port when no filter is given.
        ///
        /// # Errors
        ///
        /// Returns `InputError` if the MIDI backend cannot be initialised,
        /// no port matches or the connection fails.
        pub fn connect(
            port_filter: Option<&str>,
            tx: mpsc::Sender<InputEvent>,
        ) -> Result<Self, InputError> {
            let mut input =
                MidiInput::new(CLIENT_NAME).map_err(|e| InputError::MidiInit(e.to_string()))?;
            input.ignore(Ignore::All);

            let ports = input.ports();
            let port = ports
                .iter()
                .find(|port| match port_filter {
                    Some(filter) => input
                        .port_name(port)
                        .is_ok_and(|name| name.contains(filter)),
                    None => true,
                })
                .ok_or_else(|| InputError::NoMidiPort(port_filter.unwrap_or("*").to_string()))?;

            let port_name = input
                .port_name(port)
                .unwrap_or_else(|_| "unknown".to_string());

            let connection = input
                .connect(
                    port,
                    CLIENT_NAME,
                    move |_timestamp, bytes, _data| {
                        let Some(event) = decode_midi(bytes) else {
                            return;
                        };
                        if tx.blocking_send(event).is_err() {
                            tracing::debug!("Input channel closed, dropping MIDI event");
                        }
                    },
                    (),
                )
                .map_err(|e| InputError::MidiConnect(e.to_string()))?;

            tracing::info!(port = %port_name, "Listening for MIDI input");

            Ok(Self {
                port_name,
                _connection: connection,
            })
        }

        /// Returns the name of the connected port.
        #[must_use]
        pub fn port_name(&self) -> &str {
            &self.port_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_parsed_lines_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"on 60\n\n# fader\ncc 7 64\nbogus\noff 60\n";

        forward_lines(input, tx).await;

        assert_eq!(rx.recv().await, Some(InputEvent::NoteOn { note: 60 }));
        assert_eq!(
            rx.recv().await,
            Some(InputEvent::Controller { param: 7, value: 64 })
        );
        assert_eq!(rx.recv().await, Some(InputEvent::NoteOff { note: 60 }));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let input: &[u8] = b"on 1\non 2\n";

        forward_lines(input, tx).await;
    }
}
