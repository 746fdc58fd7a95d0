// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presets: which lights react to which notes and controllers.
//!
//! A [`PresetTable`] is loaded from a JSON file once at startup. The
//! [`resolve`] function turns one [`InputEvent`](crate::event::InputEvent)
//! into the light operations it asks for.
//!
//! # Examples
//!
//! ```
//! use humid::event::InputEvent;
//! use humid::preset::{PresetTable, resolve};
//!
//! let table = PresetTable::from_json(r#"{"Controls": {"7": {"1": ["bri"]}}}"#).unwrap();
//! let ops = resolve(&table, InputEvent::Controller { param: 7, value: 64 });
//!
//! assert_eq!(ops.len(), 1);
//! assert_eq!(ops[0].update.brightness, Some(128));
//! ```

mod resolve;
mod table;

pub use resolve::{apply_attribute, resolve, resolve_controller, resolve_note};
pub use table::{ControlMap, NoteMap, PresetLoadPolicy, PresetTable};
