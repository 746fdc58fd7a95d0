// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Hue bridge REST API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::protocol::LightSink;
use crate::types::{LightId, LightUpdate};

/// Bridge error type returned when registering without pressing the link
/// button first.
const LINK_BUTTON_NOT_PRESSED: i32 = 101;

// ============================================================================
// BridgeConfig - Connection parameters for the bridge
// ============================================================================

/// Connection parameters for a Hue bridge.
///
/// # Examples
///
/// ```
/// use humid::protocol::BridgeConfig;
/// use std::time::Duration;
///
/// let config = BridgeConfig::new("192.168.1.3")
///     .with_username("HueGoRaspberryPiUser")
///     .with_timeout(Duration::from_secs(2));
///
/// assert_eq!(config.base_url(), "http://192.168.1.3");
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    host: String,
    username: String,
    device_type: String,
    timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Default bridge address.
    pub const DEFAULT_HOST: &'static str = "192.168.1.3";
    /// Default whitelisted user name.
    pub const DEFAULT_USERNAME: &'static str = "HueGoRaspberryPiUser";
    /// Default device type used when registering.
    pub const DEFAULT_DEVICE_TYPE: &'static str = "HueGoRaspberryPi";

    /// Creates a configuration for the bridge at `host`.
    ///
    /// `host` may be a bare address, an `address:port` pair or a full
    /// `http://` / `https://` URL.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: Self::DEFAULT_USERNAME.to_string(),
            device_type: Self::DEFAULT_DEVICE_TYPE.to_string(),
            timeout: None,
        }
    }

    /// Sets the whitelisted user name used in request paths.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the device type sent when registering a new user.
    #[must_use]
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    /// Sets a request timeout. Requests have no deadline by default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the device type.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Returns the timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    ///
    /// Bare hosts are reached over plain HTTP.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }

    /// Creates a `HueClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HueClient, ProtocolError> {
        let base_url = self.base_url();

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProtocolError::Http)?;

        Ok(HueClient {
            base_url,
            username: self.username,
            device_type: self.device_type,
            client,
        })
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct RegisterBody<'a> {
    devicetype: &'a str,
}

#[derive(Debug, Deserialize)]
struct BridgeErrorBody {
    #[serde(rename = "type")]
    error_type: i32,
    #[serde(default)]
    address: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseItem {
    Success { success: serde_json::Value },
    Error { error: BridgeErrorBody },
}

impl From<BridgeErrorBody> for ProtocolError {
    fn from(error: BridgeErrorBody) -> Self {
        if error.error_type == LINK_BUTTON_NOT_PRESSED {
            return Self::LinkButtonNotPressed;
        }
        Self::Api {
            error_type: error.error_type,
            address: error.address,
            description: error.description,
        }
    }
}

// ============================================================================
// HueClient
// ============================================================================

/// HTTP client for one Hue bridge.
///
/// Light updates use `PUT /api/<username>/lights/<id>/state` with a JSON body
/// holding only the fields to change.
///
/// # Examples
///
/// ```no_run
/// use humid::protocol::{BridgeConfig, LightSink};
/// use humid::types::{LightId, LightUpdate};
///
/// # async fn example() -> humid::Result<()> {
/// let client = BridgeConfig::new("192.168.1.3").into_client()?;
/// client
///     .apply(&LightId::new("1"), &LightUpdate::new().with_power(true))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HueClient {
    base_url: String,
    username: String,
    device_type: String,
    client: Client,
}

impl HueClient {
    /// Returns the base URL of the bridge.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the user name in use.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Replaces the user name, e.g. after [`register`](Self::register).
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Builds the state URL of a light.
    fn light_state_url(&self, light: &LightId) -> String {
        format!(
            "{}/api/{}/lights/{}/state",
            self.base_url,
            urlencoding::encode(&self.username),
            urlencoding::encode(light.as_str())
        )
    }

    /// Sends a partial state update to one light.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails, the bridge answers with
    /// a non-success status, or reports an error for any field.
    pub async fn set_light_state(
        &self,
        light: &LightId,
        update: &LightUpdate,
    ) -> Result<(), ProtocolError> {
        let url = self.light_state_url(light);

        tracing::debug!(url = %url, update = %update, "Sending light state");

        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let items = Self::read_items(response).await?;
        Self::first_error(items)
    }

    /// Asks the bridge to whitelist a new user for this device type.
    ///
    /// The link button on the bridge has to be pressed shortly before.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::LinkButtonNotPressed` if the button was not
    /// pressed, or another `ProtocolError` if the request fails.
    pub async fn register(&self) -> Result<String, ProtocolError> {
        let url = format!("{}/api", self.base_url);
        let body = RegisterBody {
            devicetype: &self.device_type,
        };

        tracing::debug!(url = %url, device_type = %self.device_type, "Registering user");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        match Self::read_items(response).await?.into_iter().next() {
            Some(ResponseItem::Success { success }) => success
                .get("username")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
                .ok_or_else(|| {
                    ProtocolError::UnexpectedResponse("missing username in success".to_string())
                }),
            Some(ResponseItem::Error { error }) => Err(error.into()),
            None => Err(ProtocolError::UnexpectedResponse(
                "empty response from bridge".to_string(),
            )),
        }
    }

    async fn read_items(response: Response) -> Result<Vec<ResponseItem>, ProtocolError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown").to_string(),
            ));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received bridge response");

        serde_json::from_str(&body).map_err(|e| ProtocolError::UnexpectedResponse(e.to_string()))
    }

    fn first_error(items: Vec<ResponseItem>) -> Result<(), ProtocolError> {
        items.into_iter().try_for_each(|item| match item {
            ResponseItem::Success { .. } => Ok(()),
            ResponseItem::Error { error } => Err(error.into()),
        })
    }
}

impl LightSink for HueClient {
    async fn apply(&self, light: &LightId, update: &LightUpdate) -> Result<(), ProtocolError> {
        self.set_light_state(light, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HueClient {
        BridgeConfig::new("192.168.1.3")
            .with_username("user")
            .into_client()
            .unwrap()
    }

    #[test]
    fn light_state_url() {
        let url = client().light_state_url(&LightId::new("3"));
        assert_eq!(url, "http://192.168.1.3/api/user/lights/3/state");
    }

    #[test]
    fn light_state_url_encodes_segments() {
        let client = client().with_username("a b");
        let url = client.light_state_url(&LightId::new("hall/1"));
        assert_eq!(url, "http://192.168.1.3/api/a%20b/lights/hall%2F1/state");
    }

    #[test]
    fn config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.base_url(), "http://192.168.1.3");
        assert_eq!(config.username(), "HueGoRaspberryPiUser");
        assert_eq!(config.device_type(), "HueGoRaspberryPi");
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn base_url_variants() {
        assert_eq!(
            BridgeConfig::new("10.0.0.2:8080").base_url(),
            "http://10.0.0.2:8080"
        );
        assert_eq!(
            BridgeConfig::new("https://10.0.0.2").base_url(),
            "https://10.0.0.2"
        );
        assert_eq!(
            BridgeConfig::new("http://127.0.0.1:4321/").base_url(),
            "http://127.0.0.1:4321"
        );
    }

    #[test]
    fn parses_mixed_response_items() {
        let items: Vec<ResponseItem> = serde_json::from_str(
            r#"[
                {"success": {"/lights/1/state/on": true}},
                {"error": {"type": 201, "address": "/lights/1/state/bri", "description": "not modifiable"}}
            ]"#,
        )
        .unwrap();

        let err = HueClient::first_error(items).unwrap_err();
        assert!(matches!(err, ProtocolError::Api { error_type: 201, .. }));
    }

    #[test]
    fn link_button_error_maps_to_variant() {
        let error = BridgeErrorBody {
            error_type: 101,
            address: String::new(),
            description: "link button not pressed".to_string(),
        };
        assert!(matches!(
            ProtocolError::from(error),
            ProtocolError::LinkButtonNotPressed
        ));
    }
}
