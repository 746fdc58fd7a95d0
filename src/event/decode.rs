// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of raw MIDI messages into [`InputEvent`]s.

use super::InputEvent;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

/// Decodes one raw MIDI message.
///
/// Only note on, note off and control change messages on any channel are
/// recognised. A note on with velocity 0 is a note off. Everything else
/// (clock, sysex, pitch bend, truncated messages) yields `None`.
///
/// # Examples
///
/// ```
/// use humid::event::{InputEvent, decode_midi};
///
/// assert_eq!(
///     decode_midi(&[0xB3, 7, 64]),
///     Some(InputEvent::Controller { param: 7, value: 64 })
/// );
/// assert_eq!(decode_midi(&[0xF8]), None);
/// ```
#[must_use]
pub fn decode_midi(bytes: &[u8]) -> Option<InputEvent> {
    let (&status, data) = bytes.split_first()?;
    let &[first, second, ..] = data else {
        return None;
    };

    match status & 0xF0 {
        NOTE_ON if second == 0 => Some(InputEvent::NoteOff { note: first }),
        NOTE_ON => Some(InputEvent::NoteOn { note: first }),
        NOTE_OFF => Some(InputEvent::NoteOff { note: first }),
        CONTROL_CHANGE => Some(InputEvent::Controller {
            param: first,
            value: second,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_any_channel() {
        assert_eq!(
            decode_midi(&[0x90, 60, 100]),
            Some(InputEvent::NoteOn { note: 60 })
        );
        assert_eq!(
            decode_midi(&[0x9F, 61, 1]),
            Some(InputEvent::NoteOn { note: 61 })
        );
    }

    #[test]
    fn note_on_zero_velocity_is_note_off() {
        assert_eq!(
            decode_midi(&[0x90, 60, 0]),
            Some(InputEvent::NoteOff { note: 60 })
        );
    }

    #[test]
    fn note_off() {
        assert_eq!(
            decode_midi(&[0x80, 60, 64]),
            Some(InputEvent::NoteOff { note: 60 })
        );
    }

    #[test]
    fn control_change() {
        assert_eq!(
            decode_midi(&[0xB0, 7, 0]),
            Some(InputEvent::Controller { param: 7, value: 0 })
        );
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(decode_midi(&[]), None);
        assert_eq!(decode_midi(&[0xF8]), None);
        assert_eq!(decode_midi(&[0xC0, 5]), None);
        assert_eq!(decode_midi(&[0xE0, 0, 64]), None);
        assert_eq!(decode_midi(&[0x90, 60]), None);
    }
}
