// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input event type.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Largest value of a MIDI data byte.
pub const MAX_DATA_BYTE: u8 = 0x7F;

/// An event coming from the performance controller.
///
/// The text form accepted by [`FromStr`] is `on <note>`, `off <note>` or
/// `cc <param> <value>`:
///
/// ```
/// use humid::event::InputEvent;
///
/// let event: InputEvent = "cc 7 64".parse().unwrap();
/// assert_eq!(event, InputEvent::Controller { param: 7, value: 64 });
///
/// let event: InputEvent = "ON 60".parse().unwrap();
/// assert_eq!(event, InputEvent::NoteOn { note: 60 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// A key was pressed.
    NoteOn {
        /// Note number.
        note: u8,
    },
    /// A key was released. Observed but never acted upon.
    NoteOff {
        /// Note number.
        note: u8,
    },
    /// A knob or fader moved.
    Controller {
        /// Controller number.
        param: u8,
        /// New controller value, 0-127.
        value: u8,
    },
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoteOn { note } => write!(f, "on {note}"),
            Self::NoteOff { note } => write!(f, "off {note}"),
            Self::Controller { param, value } => write!(f, "cc {param} {value}"),
        }
    }
}

fn data_byte(field: &'static str, raw: Option<&str>) -> Result<u8, InputError> {
    let raw = raw.ok_or(InputError::MissingArgument(field))?;
    match raw.parse::<u8>() {
        Ok(value) if value <= MAX_DATA_BYTE => Ok(value),
        _ => Err(InputError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

impl FromStr for InputEvent {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or(InputError::MissingArgument("event"))?;

        let event = match kind.to_lowercase().as_str() {
            "on" | "note-on" => Self::NoteOn {
                note: data_byte("note", parts.next())?,
            },
            "off" | "note-off" => Self::NoteOff {
                note: data_byte("note", parts.next())?,
            },
            "cc" | "controller" => Self::Controller {
                param: data_byte("param", parts.next())?,
                value: data_byte("value", parts.next())?,
            },
            _ => return Err(InputError::UnknownCommand(kind.to_string())),
        };

        let rest: Vec<&str> = parts.collect();
        if !rest.is_empty() {
            return Err(InputError::TrailingInput(rest.join(" ")));
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_note_events() {
        assert_eq!("on 60".parse(), Ok(InputEvent::NoteOn { note: 60 }));
        assert_eq!("off 60".parse(), Ok(InputEvent::NoteOff { note: 60 }));
        assert_eq!("note-on 1".parse(), Ok(InputEvent::NoteOn { note: 1 }));
    }

    #[test]
    fn parse_controller_event() {
        assert_eq!(
            "  cc   7  0 ".parse(),
            Ok(InputEvent::Controller { param: 7, value: 0 })
        );
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert_eq!(
            "pitch 3".parse::<InputEvent>(),
            Err(InputError::UnknownCommand("pitch".to_string()))
        );
    }

    #[test]
    fn parse_rejects_missing_argument() {
        assert_eq!(
            "cc 7".parse::<InputEvent>(),
            Err(InputError::MissingArgument("value"))
        );
        assert_eq!(
            "".parse::<InputEvent>(),
            Err(InputError::MissingArgument("event"))
        );
    }

    #[test]
    fn parse_rejects_out_of_range_data() {
        assert_eq!(
            "on 128".parse::<InputEvent>(),
            Err(InputError::InvalidNumber {
                field: "note",
                value: "128".to_string()
            })
        );
        assert!("cc 7 -1".parse::<InputEvent>().is_err());
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert_eq!(
            "off 60 61".parse::<InputEvent>(),
            Err(InputError::TrailingInput("61".to_string()))
        );
    }

    #[test]
    fn display_uses_text_syntax() {
        let event = InputEvent::Controller {
            param: 7,
            value: 64,
        };
        assert_eq!(event.to_string(), "cc 7 64");
        assert_eq!(event.to_string().parse(), Ok(event));
    }
}
