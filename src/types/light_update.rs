// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial light state updates.
//!
//! A [`LightUpdate`] only carries the attributes that should change. Every
//! field is an `Option`: `None` means "leave untouched", which is different
//! from `Some(false)` or `Some(0)`.
//!
//! Numeric fields are plain integers and are not range checked here. The
//! bridge owns the valid ranges and rejects an out-of-range field on its own,
//! so one bad preset value never invalidates the rest of the update.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A partial update of a light's state.
///
/// Serializes with the Hue bridge field names (`on`, `hue`, `sat`, `bri`)
/// and omits absent fields, so the same value is used for the preset file
/// and for the body of the bridge request.
///
/// # Examples
///
/// ```
/// use humid::types::LightUpdate;
///
/// let mut pending = LightUpdate::new().with_power(true).with_brightness(10);
/// pending.merge(&LightUpdate::new().with_brightness(90));
///
/// assert_eq!(pending.power, Some(true));
/// assert_eq!(pending.brightness, Some(90));
/// assert_eq!(pending.hue, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightUpdate {
    /// Power state.
    #[serde(rename = "on", default, skip_serializing_if = "Option::is_none")]
    pub power: Option<bool>,

    /// Hue, 0-65535 on the bridge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<i32>,

    /// Saturation, 0-254 on the bridge.
    #[serde(rename = "sat", default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<i32>,

    /// Brightness, 1-254 on the bridge.
    #[serde(rename = "bri", default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i32>,
}

impl LightUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            power: None,
            hue: None,
            saturation: None,
            brightness: None,
        }
    }

    /// Sets the power field.
    #[must_use]
    pub const fn with_power(mut self, on: bool) -> Self {
        self.power = Some(on);
        self
    }

    /// Sets the hue field.
    #[must_use]
    pub const fn with_hue(mut self, hue: i32) -> Self {
        self.hue = Some(hue);
        self
    }

    /// Sets the saturation field.
    #[must_use]
    pub const fn with_saturation(mut self, saturation: i32) -> Self {
        self.saturation = Some(saturation);
        self
    }

    /// Sets the brightness field.
    #[must_use]
    pub const fn with_brightness(mut self, brightness: i32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// Returns true if no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.power.is_none()
            && self.hue.is_none()
            && self.saturation.is_none()
            && self.brightness.is_none()
    }

    /// Overwrites every field that is present in `newer`.
    ///
    /// Fields absent from `newer` keep their current value.
    pub fn merge(&mut self, newer: &Self) {
        if newer.power.is_some() {
            self.power = newer.power;
        }
        if newer.hue.is_some() {
            self.hue = newer.hue;
        }
        if newer.saturation.is_some() {
            self.saturation = newer.saturation;
        }
        if newer.brightness.is_some() {
            self.brightness = newer.brightness;
        }
    }
}

impl fmt::Display for LightUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut sep = "";
        if let Some(on) = self.power {
            write!(f, "{sep}on: {on}")?;
            sep = ", ";
        }
        if let Some(hue) = self.hue {
            write!(f, "{sep}hue: {hue}")?;
            sep = ", ";
        }
        if let Some(sat) = self.saturation {
            write!(f, "{sep}sat: {sat}")?;
            sep = ", ";
        }
        if let Some(bri) = self.brightness {
            write!(f, "{sep}bri: {bri}")?;
        }
        f.write_str("}")
    }
}
