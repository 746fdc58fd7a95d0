// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light identifier type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a light on the Hue bridge.
///
/// The bridge addresses lights by the string key it assigned them
/// (`"1"`, `"2"`, ...). The same key is used in the preset file.
///
/// # Examples
///
/// ```
/// use humid::types::LightId;
///
/// let id = LightId::new("3");
/// assert_eq!(id.as_str(), "3");
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightId(String);

impl LightId {
    /// Creates a light identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LightId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LightId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for LightId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
