// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the resolver, the queue and the bridge client.
//!
//! - [`LightId`] - Key of a light on the Hue bridge
//! - [`LightUpdate`] - Partial light state where every field is optional

mod light_id;
mod light_update;

pub use light_id::LightId;
pub use light_update::LightUpdate;
