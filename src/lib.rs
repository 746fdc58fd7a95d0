// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `humid` - Drive Philips Hue lights from a MIDI controller.
//!
//! Notes and controller moves are mapped to light updates by a preset file.
//! Updates are sent to the Hue bridge one request at a time; whatever
//! arrives while a request is in flight is coalesced per light, so a fast
//! fader sweep never floods the bridge and the lights always end up in the
//! most recent requested state.
//!
//! # Pipeline
//!
//! ```text
//! input source -> preset resolver -> coalescing queue -> coordinator
//!              -> handoff -> delivery worker -> Hue bridge
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use humid::dispatch::{Dispatcher, event_channel};
//! use humid::event::InputEvent;
//! use humid::preset::{PresetLoadPolicy, PresetTable};
//! use humid::protocol::BridgeConfig;
//!
//! #[tokio::main]
//! async fn main() -> humid::Result<()> {
//!     let presets = PresetTable::load_with_policy("presets.json", PresetLoadPolicy::Continue)?;
//!     let client = BridgeConfig::new("192.168.1.3")
//!         .with_username("HueGoRaspberryPiUser")
//!         .into_client()?;
//!
//!     let (events_tx, events_rx) = event_channel();
//!     tokio::spawn(async move {
//!         let _ = events_tx.send(InputEvent::Controller { param: 7, value: 64 }).await;
//!     });
//!
//!     Dispatcher::new(Arc::new(presets), client).run(events_rx).await;
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `midi`: read events from a MIDI input port through `midir`.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod preset;
pub mod protocol;
pub mod queue;
pub mod types;

pub use dispatch::{Coordinator, DeliveryStats, DeliveryWorker, Dispatcher};
pub use error::{Error, InputError, PresetError, ProtocolError, Result};
pub use event::InputEvent;
pub use preset::{PresetLoadPolicy, PresetTable};
pub use protocol::{BridgeConfig, HueClient, LightSink};
pub use queue::{CoalescingQueue, Enqueued, LightOperation};
pub use types::{LightId, LightUpdate};
