// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivery of light updates to the Hue bridge.
//!
//! The delivery worker only depends on the [`LightSink`] trait. The
//! production implementation is [`HueClient`], which talks to the bridge's
//! REST API over HTTP.

mod hue;

pub use hue::{BridgeConfig, HueClient};

use crate::error::ProtocolError;
use crate::types::{LightId, LightUpdate};

/// Something that can apply a partial update to one light.
///
/// Implementations make exactly one request per call; there is no batching
/// at this layer.
#[allow(async_fn_in_trait)]
pub trait LightSink {
    /// Applies `update` to `light`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the update could not be delivered or was
    /// rejected.
    async fn apply(&self, light: &LightId, update: &LightUpdate) -> Result<(), ProtocolError>;
}

impl<S: LightSink> LightSink for &S {
    async fn apply(&self, light: &LightId, update: &LightUpdate) -> Result<(), ProtocolError> {
        (**self).apply(light, update).await
    }
}
