// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for loading preset files from disk.

use std::io::Write;

use humid::PresetError;
use humid::event::InputEvent;
use humid::preset::{PresetLoadPolicy, PresetTable, resolve};
use humid::types::LightUpdate;
use tempfile::NamedTempFile;

fn preset_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_resolves_file() {
    let file = preset_file(
        r#"{
            "Controls": { "7": { "kitchen": ["bri"] } },
            "notes": { "36": { "kitchen": { "on": true, "hue": 46920, "sat": 254 } } }
        }"#,
    );

    let table = PresetTable::load(file.path()).unwrap();

    let ops = resolve(&table, InputEvent::NoteOn { note: 36 });
    assert_eq!(ops.len(), 1);
    assert_eq!(
        ops[0].update,
        LightUpdate::new()
            .with_power(true)
            .with_hue(46920)
            .with_saturation(254)
    );

    let ops = resolve(&table, InputEvent::Controller { param: 7, value: 64 });
    assert_eq!(
        ops[0].update,
        LightUpdate::new().with_power(true).with_brightness(128)
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("presets.json");

    let err = PresetTable::load(&path).unwrap_err();
    assert!(matches!(err, PresetError::Io { .. }));
}

#[test]
fn malformed_file_is_json_error() {
    let file = preset_file(r#"{"notes": {"1": "#);

    let err = PresetTable::load(file.path()).unwrap_err();
    assert!(matches!(err, PresetError::Json { .. }));
}

#[test]
fn continue_policy_falls_back_to_empty_tables() {
    let file = preset_file("not json");

    let table = PresetTable::load_with_policy(file.path(), PresetLoadPolicy::Continue).unwrap();
    assert!(table.is_empty());
    assert!(resolve(&table, InputEvent::NoteOn { note: 60 }).is_empty());
}

#[test]
fn abort_policy_returns_error() {
    let file = preset_file("not json");

    let result = PresetTable::load_with_policy(file.path(), PresetLoadPolicy::Abort);
    assert!(matches!(result, Err(PresetError::Json { .. })));
}

#[test]
fn abort_policy_loads_valid_file() {
    let file = preset_file(r#"{"Controls": {}, "notes": {}}"#);

    let table = PresetTable::load_with_policy(file.path(), PresetLoadPolicy::Abort).unwrap();
    assert!(table.is_empty());
}

#[test]
fn out_of_range_value_does_not_empty_the_table() {
    let file = preset_file(
        r#"{
            "Controls": { "7": { "kitchen": ["bri"] } },
            "notes": {
                "36": { "kitchen": { "bri": 300 } },
                "37": { "hall": { "on": true } }
            }
        }"#,
    );

    let table = PresetTable::load_with_policy(file.path(), PresetLoadPolicy::Continue).unwrap();
    assert!(!table.is_empty());

    let ops = resolve(&table, InputEvent::NoteOn { note: 36 });
    assert_eq!(ops[0].update, LightUpdate::new().with_brightness(300));
    let ops = resolve(&table, InputEvent::NoteOn { note: 37 });
    assert_eq!(ops[0].update, LightUpdate::new().with_power(true));
}
