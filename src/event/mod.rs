// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input events from the performance controller.
//!
//! Events reach the coordinator over a tokio `mpsc` channel. This module
//! provides the event type, raw MIDI decoding and the producers that fill
//! the channel: a line based text source (stdin) and, with the `midi`
//! feature, a MIDI port listener.
//!
//! # Examples
//!
//! ```
//! use humid::event::{InputEvent, decode_midi};
//!
//! let from_text: InputEvent = "on 60".parse().unwrap();
//! let from_wire = decode_midi(&[0x90, 60, 127]).unwrap();
//! assert_eq!(from_text, from_wire);
//! ```

mod decode;
mod input_event;
pub mod source;

pub use decode::decode_midi;
pub use input_event::{InputEvent, MAX_DATA_BYTE};
