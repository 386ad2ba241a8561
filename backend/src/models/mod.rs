//! Domain models for the GUI configuration.
//!
//! - [`DeploymentParameters`] - The seven deployment-specific values substituted
//!   into the `juju_config` script

use serde::{Deserialize, Serialize};

// =============================================================================
// Field Names
// =============================================================================

/// Parameter keys, in the order they are substituted into the script.
pub const FIELD_NAMES: [&str; 7] = [
    "base",
    "staticURL",
    "version",
    "uuid",
    "host",
    "controllerSocket",
    "socket",
];

/// Scheme used for every websocket address the GUI connects to.
pub const SOCKET_SCHEME: &str = "wss";

// =============================================================================
// Deployment Parameters
// =============================================================================

/// Deployment-specific values for one render.
///
/// Values are plain strings and are not validated here; see
/// [`crate::validation::lint`] for advisory checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentParameters {
    /// Base URL path the GUI is served under (e.g. `/gui/`).
    pub base: String,
    /// URL for static assets.
    #[serde(rename = "staticURL")]
    pub static_url: String,
    /// Juju core version.
    pub version: String,
    /// Environment (model) UUID.
    pub uuid: String,
    /// `hostname:port` of the API websocket.
    pub host: String,
    /// Controller socket path template.
    #[serde(rename = "controllerSocket")]
    pub controller_socket: String,
    /// Model socket path template.
    pub socket: String,
}

impl DeploymentParameters {
    /// Key/value pairs in substitution order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (FIELD_NAMES[0], self.base.as_str()),
            (FIELD_NAMES[1], self.static_url.as_str()),
            (FIELD_NAMES[2], self.version.as_str()),
            (FIELD_NAMES[3], self.uuid.as_str()),
            (FIELD_NAMES[4], self.host.as_str()),
            (FIELD_NAMES[5], self.controller_socket.as_str()),
            (FIELD_NAMES[6], self.socket.as_str()),
        ]
    }

    /// First key whose value is empty, if any.
    pub fn first_missing(&self) -> Option<&'static str> {
        self.fields()
            .into_iter()
            .find(|(_, value)| value.is_empty())
            .map(|(key, _)| key)
    }

    /// Websocket address of the API server.
    pub fn api_address(&self) -> String {
        format!("{}://{}", SOCKET_SCHEME, self.host)
    }

    /// Split `host` into server and port.
    ///
    /// The port is only split off when everything after the last `:` is
    /// numeric, so bare IPv6 addresses stay intact.
    pub fn server_and_port(&self) -> (&str, Option<&str>) {
        match self.host.rsplit_once(':') {
            Some((server, port))
                if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) =>
            {
                (server, Some(port))
            }
            _ => (self.host.as_str(), None),
        }
    }

    /// Expand `$server`/`$host`, `$port` and `$uuid` in a socket template.
    ///
    /// Placeholders are expanded in one pass, so a substituted value that
    /// itself contains `$uuid` (or similar) is inserted literally. Templates
    /// that are a bare path (leading `/`) are resolved against
    /// [`Self::api_address`].
    pub fn expand_socket_template(&self, template: &str) -> String {
        let (server, port) = self.server_and_port();
        let path = regex::Regex::new(r"\$(server|host|port|uuid)")
            .ok()
            .map(|re| {
                re.replace_all(template, |caps: &regex::Captures| match &caps[1] {
                    "server" | "host" => server.to_string(),
                    "port" => port.unwrap_or("").to_string(),
                    _ => self.uuid.clone(),
                })
                .into_owned()
            })
            .unwrap_or_else(|| template.to_string());

        if path.starts_with('/') {
            format!("{}{}", self.api_address(), path)
        } else {
            path
        }
    }

    /// Fully expanded model websocket URL.
    pub fn model_socket_url(&self) -> String {
        self.expand_socket_template(&self.socket)
    }

    /// Fully expanded controller websocket URL.
    pub fn controller_socket_url(&self) -> String {
        self.expand_socket_template(&self.controller_socket)
    }
}
