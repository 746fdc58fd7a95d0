// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The preset table and its loader.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PresetError;
use crate::types::{LightId, LightUpdate};

/// Attribute names per light, applied in order for a controller.
pub type ControlMap = BTreeMap<LightId, Vec<String>>;

/// Fixed update per light for a note.
pub type NoteMap = BTreeMap<LightId, LightUpdate>;

/// Mapping from controller and note numbers to light updates.
///
/// Keys are the decimal controller or note number as a string, exactly as
/// they appear in the preset file. The table is loaded once at startup and
/// never mutated afterwards.
///
/// ```json
/// {
///   "Controls": { "7": { "1": ["bri"], "2": ["on", "hue"] } },
///   "notes": { "60": { "1": { "on": true, "bri": 254 } } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PresetTable {
    /// Controller number to per-light attribute lists.
    #[serde(rename = "Controls", alias = "controls", default)]
    pub controls: HashMap<String, ControlMap>,

    /// Note number to per-light updates.
    #[serde(rename = "notes", alias = "Notes", default)]
    pub notes: HashMap<String, NoteMap>,
}

/// What to do when the preset file cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PresetLoadPolicy {
    /// Log the failure and run with empty tables.
    #[default]
    Continue,
    /// Return the failure to the caller.
    Abort,
}

impl PresetTable {
    /// Parses a preset document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses the preset file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::Io` if the file cannot be read and
    /// `PresetError::Json` if it is not a valid preset document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_json(&contents).map_err(|source| PresetError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            controls = table.controls.len(),
            notes = table.notes.len(),
            "Loaded presets"
        );
        tracing::debug!(presets = ?table, "Preset table");

        Ok(table)
    }

    /// Loads the preset file, applying `policy` on failure.
    ///
    /// # Errors
    ///
    /// Only returns an error with [`PresetLoadPolicy::Abort`].
    pub fn load_with_policy(
        path: impl AsRef<Path>,
        policy: PresetLoadPolicy,
    ) -> Result<Self, PresetError> {
        match (Self::load(path), policy) {
            (Ok(table), _) => Ok(table),
            (Err(e), PresetLoadPolicy::Continue) => {
                tracing::error!(error = %e, "Continuing with empty presets");
                Ok(Self::default())
            }
            (Err(e), PresetLoadPolicy::Abort) => Err(e),
        }
    }

    /// Returns the attribute lists bound to controller `param`.
    #[must_use]
    pub fn control(&self, param: u8) -> Option<&ControlMap> {
        self.controls.get(&param.to_string())
    }

    /// Returns the updates bound to `note`.
    #[must_use]
    pub fn note(&self, note: u8) -> Option<&NoteMap> {
        self.notes.get(&note.to_string())
    }

    /// Returns true if neither controls nor notes are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty() && self.notes.is_empty()
    }
}
