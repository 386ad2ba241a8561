//! Assembling [`DeploymentParameters`] from layered sources.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. A JSON parameter file (keys as in [`crate::models::FIELD_NAMES`])
//! 2. `JUJUGUI_*` environment variables (see [`ENV_VARS`])
//! 3. Explicit values, e.g. CLI flags
//!
//! Each layer is a [`ParamsBuilder`]; later layers are merged over earlier
//! ones and [`ParamsBuilder::build`] reports the first field nobody set.
//! Blank strings count as unset.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ParamsError, ParamsResult};
use crate::models::DeploymentParameters;

/// Environment variable for each parameter key.
pub const ENV_VARS: [(&str, &str); 7] = [
    ("base", "JUJUGUI_BASE"),
    ("staticURL", "JUJUGUI_STATIC_URL"),
    ("version", "JUJUGUI_VERSION"),
    ("uuid", "JUJUGUI_UUID"),
    ("host", "JUJUGUI_HOST"),
    ("controllerSocket", "JUJUGUI_CONTROLLER_SOCKET"),
    ("socket", "JUJUGUI_SOCKET"),
];

/// Partially specified parameters from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsBuilder {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default, rename = "staticURL")]
    pub static_url: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, rename = "controllerSocket")]
    pub controller_socket: Option<String>,
    #[serde(default)]
    pub socket: Option<String>,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON parameter file.
    pub fn from_file(path: impl AsRef<Path>) -> ParamsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse a JSON parameter object.
    pub fn from_json(content: &str) -> ParamsResult<Self> {
        let builder: ParamsBuilder = serde_json::from_str(content)?;
        Ok(builder.normalized())
    }

    /// Read the `JUJUGUI_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (used for testing).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new();
        for (key, var) in ENV_VARS {
            if let Some(value) = lookup(var) {
                builder.set(key, value);
            }
        }
        builder
    }

    /// Set a value by parameter key. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = non_blank(Some(value.into()));
        match key {
            "base" => self.base = value,
            "staticURL" => self.static_url = value,
            "version" => self.version = value,
            "uuid" => self.uuid = value,
            "host" => self.host = value,
            "controllerSocket" => self.controller_socket = value,
            "socket" => self.socket = value,
            _ => {}
        }
    }

    pub fn base(mut self, value: impl Into<String>) -> Self {
        self.set("base", value);
        self
    }

    pub fn static_url(mut self, value: impl Into<String>) -> Self {
        self.set("staticURL", value);
        self
    }

    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.set("version", value);
        self
    }

    pub fn uuid(mut self, value: impl Into<String>) -> Self {
        self.set("uuid", value);
        self
    }

    pub fn host(mut self, value: impl Into<String>) -> Self {
        self.set("host", value);
        self
    }

    pub fn controller_socket(mut self, value: impl Into<String>) -> Self {
        self.set("controllerSocket", value);
        self
    }

    pub fn socket(mut self, value: impl Into<String>) -> Self {
        self.set("socket", value);
        self
    }

    /// Layer `overlay` on top of `self`; set values in `overlay` win.
    pub fn merge(self, overlay: ParamsBuilder) -> Self {
        let overlay = overlay.normalized();
        Self {
            base: overlay.base.or(self.base),
            static_url: overlay.static_url.or(self.static_url),
            version: overlay.version.or(self.version),
            uuid: overlay.uuid.or(self.uuid),
            host: overlay.host.or(self.host),
            controller_socket: overlay.controller_socket.or(self.controller_socket),
            socket: overlay.socket.or(self.socket),
        }
    }

    /// Finish, failing on the first unset field.
    pub fn build(self) -> ParamsResult<DeploymentParameters> {
        let b = self.normalized();
        Ok(DeploymentParameters {
            base: b.base.ok_or(ParamsError::MissingField("base"))?,
            static_url: b.static_url.ok_or(ParamsError::MissingField("staticURL"))?,
            version: b.version.ok_or(ParamsError::MissingField("version"))?,
            uuid: b.uuid.ok_or(ParamsError::MissingField("uuid"))?,
            host: b.host.ok_or(ParamsError::MissingField("host"))?,
            controller_socket: b
                .controller_socket
                .ok_or(ParamsError::MissingField("controllerSocket"))?,
            socket: b.socket.ok_or(ParamsError::MissingField("socket"))?,
        })
    }

    fn normalized(self) -> Self {
        Self {
            base: non_blank(self.base),
            static_url: non_blank(self.static_url),
            version: non_blank(self.version),
            uuid: non_blank(self.uuid),
            host: non_blank(self.host),
            controller_socket: non_blank(self.controller_socket),
            socket: non_blank(self.socket),
        }
    }
}

impl From<DeploymentParameters> for ParamsBuilder {
    fn from(params: DeploymentParameters) -> Self {
        Self {
            base: Some(params.base),
            static_url: Some(params.static_url),
            version: Some(params.version),
            uuid: Some(params.uuid),
            host: Some(params.host),
            controller_socket: Some(params.controller_socket),
            socket: Some(params.socket),
        }
        .normalized()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn complete() -> ParamsBuilder {
        ParamsBuilder::new()
            .base("/gui/")
            .static_url("/static")
            .version("2.9.0")
            .uuid("abc-123")
            .host("10.0.0.1:17070")
            .controller_socket("/api")
            .socket("/model/$uuid/api")
    }

    #[test]
    fn test_build_complete() {
        let params = complete().build().unwrap();
        assert_eq!(params.base, "/gui/");
        assert_eq!(params.socket, "/model/$uuid/api");
    }

    #[test]
    fn test_build_reports_first_missing() {
        let mut builder = complete();
        builder.version = None;
        builder.socket = None;
        match builder.build() {
            Err(ParamsError::MissingField(key)) => assert_eq!(key, "version"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let builder = complete().host("   ");
        assert!(matches!(builder.build(), Err(ParamsError::MissingField("host"))));
    }

    #[test]
    fn test_merge_precedence() {
        let file = complete();
        let env = ParamsBuilder::new().version("3.0.0").host("");
        let flags = ParamsBuilder::new().version("3.1.0");

        let params = file.merge(env).merge(flags).build().unwrap();
        assert_eq!(params.version, "3.1.0");
        // blank overlay never clears a lower layer
        assert_eq!(params.host, "10.0.0.1:17070");
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("JUJUGUI_BASE", "/env/"),
            ("JUJUGUI_CONTROLLER_SOCKET", "/controller"),
            ("JUJUGUI_UNRELATED", "x"),
        ]
        .into_iter()
        .collect();

        let builder = ParamsBuilder::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(builder.base.as_deref(), Some("/env/"));
        assert_eq!(builder.controller_socket.as_deref(), Some("/controller"));
        assert_eq!(builder.uuid, None);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base": "/gui/", "staticURL": "/static", "uuid": "", "socket": null}}"#
        )
        .unwrap();

        let builder = ParamsBuilder::from_file(file.path()).unwrap();
        assert_eq!(builder.static_url.as_deref(), Some("/static"));
        assert_eq!(builder.uuid, None);
        assert_eq!(builder.socket, None);
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let result = ParamsBuilder::from_json(r#"{"base": "/", "baseUrl": "/"}"#);
        assert!(matches!(result, Err(ParamsError::Json(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ParamsBuilder::from_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ParamsError::Io(_))));
    }

    #[test]
    fn test_from_parameters_round_trip() {
        let params = complete().build().unwrap();
        let rebuilt = ParamsBuilder::from(params.clone()).build().unwrap();
        assert_eq!(rebuilt, params);
    }
}
