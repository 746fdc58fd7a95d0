// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of input events into light operations.
//!
//! Everything here is pure: the same event and table always give the same
//! operations, in light id order. Unmapped notes and controllers give no
//! operations and are not errors, preset tables are meant to be sparse.

use crate::event::InputEvent;
use crate::queue::LightOperation;
use crate::types::LightUpdate;

use super::PresetTable;

/// Resolves one input event against the preset table.
#[must_use]
pub fn resolve(table: &PresetTable, event: InputEvent) -> Vec<LightOperation> {
    match event {
        InputEvent::NoteOn { note } => resolve_note(table, note),
        InputEvent::NoteOff { .. } => Vec::new(),
        InputEvent::Controller { param, value } => resolve_controller(table, param, value),
    }
}

/// Returns the stored update of every light bound to `note`.
#[must_use]
pub fn resolve_note(table: &PresetTable, note: u8) -> Vec<LightOperation> {
    let Some(lights) = table.note(note) else {
        tracing::trace!(note, "No preset for note");
        return Vec::new();
    };

    lights
        .iter()
        .map(|(light, update)| LightOperation::new(light.clone(), *update))
        .collect()
}

/// Builds one update per light bound to controller `param`.
#[must_use]
pub fn resolve_controller(table: &PresetTable, param: u8, value: u8) -> Vec<LightOperation> {
    let Some(lights) = table.control(param) else {
        tracing::trace!(param, "No preset for controller");
        return Vec::new();
    };

    lights
        .iter()
        .map(|(light, attributes)| {
            let update = attributes
                .iter()
                .fold(LightUpdate::new(), |update, attr| {
                    apply_attribute(update, attr, value)
                });
            LightOperation::new(light.clone(), update)
        })
        .collect()
}

/// Applies one controller attribute to `update`.
///
/// Controller values are 7-bit; they are doubled to reach the bridge's
/// 8-bit brightness and saturation range, and hue additionally shifted
/// into its 16-bit range. Larger values are passed through unclamped. A brightness of zero turns the light off instead.
/// Unknown attribute names leave `update` unchanged.
#[must_use]
pub fn apply_attribute(update: LightUpdate, attribute: &str, value: u8) -> LightUpdate {
    let doubled = i32::from(value).saturating_mul(2);

    match attribute {
        "on" => update.with_power(true),
        "off" => update.with_power(false),
        "bri" if value == 0 => update.with_power(false),
        "bri" => update.with_brightness(doubled).with_power(true),
        "sat" => update.with_saturation(doubled),
        "hue" => update.with_hue(doubled << 8),
        _ => update,
    }
}
