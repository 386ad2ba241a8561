//! Rendering of the `juju_config` script loaded by the GUI at startup.
//!
//! The output is a single `var` declaration assigning an object literal.
//! Seven keys carry [`DeploymentParameters`] values; the rest are constants
//! emitted verbatim on every render.
//!
//! ```text
//! var juju_config = {
//!     "baseUrl": "/gui/",
//!     ...
//!     "serverRouting": false
//! };
//! ```
//!
//! Substituted values are JSON-encoded, so quotes and backslashes in the
//! input never break out of their string literal.
//!
//! # Example
//!
//! ```rust,ignore
//! use jujugui_config::{ConfigRenderer, DeploymentParameters};
//!
//! let script = ConfigRenderer::new().render(&params)?;
//! let back = jujugui_config::parse(&script)?.parameters()?;
//! assert_eq!(back, params);
//! ```

use serde_json::{Map, Value};

use crate::error::{RenderError, RenderResult};
use crate::models::{DeploymentParameters, SOCKET_SCHEME};

/// Global variable the GUI reads its configuration from.
pub const DEFAULT_GLOBAL: &str = "juju_config";

// =============================================================================
// Fixed Fields
// =============================================================================

/// A constant value emitted unchanged on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedValue {
    Str(&'static str),
    Bool(bool),
}

impl FixedValue {
    pub fn to_value(self) -> Value {
        match self {
            FixedValue::Str(s) => Value::String(s.to_string()),
            FixedValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// Constant keys, in output order after the substituted ones.
pub const FIXED_FIELDS: [(&str, FixedValue); 13] = [
    ("socket_protocol", FixedValue::Str(SOCKET_SCHEME)),
    ("charmstoreAPIPath", FixedValue::Str("v4")),
    ("charmstoreURL", FixedValue::Str("https://api.jujucharms.com/charmstore/")),
    ("bundleServiceURL", FixedValue::Str("https://api.jujucharms.com/bundleservice/")),
    ("plansURL", FixedValue::Str("https://api.jujucharms.com/omnibus/")),
    ("paymentURL", FixedValue::Str("https://api.jujucharms.com/payment/")),
    ("termsURL", FixedValue::Str("https://api.jujucharms.com/terms/")),
    ("interactiveLogin", FixedValue::Bool(true)),
    ("html5", FixedValue::Bool(true)),
    ("container", FixedValue::Str("#main")),
    ("viewContainer", FixedValue::Str("#main")),
    ("consoleEnabled", FixedValue::Bool(true)),
    ("serverRouting", FixedValue::Bool(false)),
];

/// Output keys for the substituted values, paired with their parameter key.
pub const SUBSTITUTED_FIELDS: [(&str, &str); 7] = [
    ("baseUrl", "base"),
    ("staticURL", "staticURL"),
    ("jujuCoreVersion", "version"),
    ("jujuEnvUUID", "uuid"),
    ("apiAddress", "host"),
    ("controllerSocketTemplate", "controllerSocket"),
    ("socketTemplate", "socket"),
];

// =============================================================================
// Renderer
// =============================================================================

/// Renders [`DeploymentParameters`] into the configuration script.
///
/// Stateless apart from the name of the global it declares.
#[derive(Debug, Clone)]
pub struct ConfigRenderer {
    global: String,
}

impl ConfigRenderer {
    pub fn new() -> Self {
        Self {
            global: DEFAULT_GLOBAL.to_string(),
        }
    }

    /// Declare the object under a different global variable name.
    ///
    /// The name must be a plain JavaScript identifier, otherwise the output
    /// would not parse (or would carry extra statements).
    pub fn with_global(global: impl Into<String>) -> RenderResult<Self> {
        let global = global.into();
        if !is_identifier(&global) {
            return Err(RenderError::Malformed(format!(
                "invalid variable name '{}'",
                global
            )));
        }
        Ok(Self { global })
    }

    pub fn global(&self) -> &str {
        &self.global
    }

    /// Render the script text.
    ///
    /// Fails with [`RenderError::MissingField`] when any parameter is empty.
    pub fn render(&self, params: &DeploymentParameters) -> RenderResult<String> {
        let entries = entries(params)?;
        let last = entries.len() - 1;

        let mut out = format!("var {} = {{\n", self.global);
        for (i, (key, value)) in entries.iter().enumerate() {
            let separator = if i == last { "" } else { "," };
            out.push_str(&format!(
                "    \"{}\": {}{}\n",
                key,
                serde_json::to_string(value)?,
                separator
            ));
        }
        out.push_str("};\n");

        Ok(out)
    }

    /// The configuration object as an ordered JSON map.
    pub fn render_value(&self, params: &DeploymentParameters) -> RenderResult<Value> {
        let map: Map<String, Value> = entries(params)?
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Ok(Value::Object(map))
    }
}

impl Default for ConfigRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render with the default global name.
pub fn render(params: &DeploymentParameters) -> RenderResult<String> {
    ConfigRenderer::new().render(params)
}

/// Build the ordered key/value list for one render.
fn entries(params: &DeploymentParameters) -> RenderResult<Vec<(&'static str, Value)>> {
    if let Some(key) = params.first_missing() {
        return Err(RenderError::MissingField(key));
    }

    let substituted = [
        params.base.clone(),
        params.static_url.clone(),
        params.version.clone(),
        params.uuid.clone(),
        params.api_address(),
        params.controller_socket.clone(),
        params.socket.clone(),
    ];

    let mut entries: Vec<(&'static str, Value)> = SUBSTITUTED_FIELDS
        .iter()
        .zip(substituted)
        .map(|((key, _), value)| (*key, Value::String(value)))
        .collect();
    entries.extend(FIXED_FIELDS.iter().map(|(key, value)| (*key, value.to_value())));

    Ok(entries)
}

// =============================================================================
// Parsing
// =============================================================================

/// A configuration script parsed back into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedConfig {
    /// Name of the declared global.
    pub global: String,
    /// The object literal.
    pub object: Map<String, Value>,
}

impl RenderedConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.object.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.object.clone())
    }

    /// Recover the parameters that produced this script.
    pub fn parameters(&self) -> RenderResult<DeploymentParameters> {
        let api_address = self.string("apiAddress", "host")?;
        let prefix = format!("{}://", SOCKET_SCHEME);
        let host = api_address.strip_prefix(&prefix).ok_or_else(|| {
            RenderError::Malformed(format!("apiAddress does not start with {}", prefix))
        })?;

        Ok(DeploymentParameters {
            base: self.string("baseUrl", "base")?.to_string(),
            static_url: self.string("staticURL", "staticURL")?.to_string(),
            version: self.string("jujuCoreVersion", "version")?.to_string(),
            uuid: self.string("jujuEnvUUID", "uuid")?.to_string(),
            host: host.to_string(),
            controller_socket: self
                .string("controllerSocketTemplate", "controllerSocket")?
                .to_string(),
            socket: self.string("socketTemplate", "socket")?.to_string(),
        })
    }

    /// Fixed keys whose value differs from the constant (or is absent).
    pub fn fixed_field_mismatches(&self) -> Vec<&'static str> {
        FIXED_FIELDS
            .iter()
            .filter(|(key, value)| self.object.get(*key) != Some(&value.to_value()))
            .map(|(key, _)| *key)
            .collect()
    }

    fn string(&self, key: &str, param: &'static str) -> RenderResult<&str> {
        match self.object.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s),
            Some(Value::String(_)) | None => Err(RenderError::MissingField(param)),
            Some(other) => Err(RenderError::Malformed(format!(
                "{} must be a string, got {}",
                key, other
            ))),
        }
    }
}

/// Parse a configuration script.
///
/// Accepts the output of [`ConfigRenderer::render`] as well as the legacy
/// template output, which leaves a trailing comma after the last entry.
pub fn parse(text: &str) -> RenderResult<RenderedConfig> {
    let body = text.trim();

    let declaration = body
        .strip_prefix("var ")
        .ok_or_else(|| RenderError::Malformed("expected a `var` declaration".into()))?;

    let (name, literal) = declaration
        .split_once('=')
        .ok_or_else(|| RenderError::Malformed("expected `=` after the variable name".into()))?;

    let global = name.trim();
    if !is_identifier(global) {
        return Err(RenderError::Malformed(format!("invalid variable name '{}'", global)));
    }

    let literal = literal
        .trim()
        .strip_suffix(';')
        .ok_or_else(|| RenderError::Malformed("expected `;` after the object literal".into()))?
        .trim_end();

    let value: Value = match serde_json::from_str(literal) {
        Ok(v) => v,
        Err(e) => match strip_trailing_comma(literal) {
            Some(fixed) => serde_json::from_str(&fixed)?,
            None => return Err(e.into()),
        },
    };

    match value {
        Value::Object(object) => Ok(RenderedConfig {
            global: global.to_string(),
            object,
        }),
        other => Err(RenderError::Malformed(format!(
            "expected an object literal, got {}",
            other
        ))),
    }
}

fn strip_trailing_comma(literal: &str) -> Option<String> {
    let inner = literal.strip_suffix('}')?.trim_end();
    let inner = inner.strip_suffix(',')?;
    Some(format!("{}\n}}", inner))
}

/// Words that cannot name a `var`.
const RESERVED_WORDS: [&str; 38] = [
    "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "import", "in", "instanceof", "let",
    "new", "null", "return", "static", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while",
];

fn is_identifier(name: &str) -> bool {
    if RESERVED_WORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeploymentParameters {
        DeploymentParameters {
            base: "/gui/".into(),
            static_url: "/static".into(),
            version: "2.9.0".into(),
            uuid: "abc-123".into(),
            host: "10.0.0.1:17070".into(),
            controller_socket: "/controller-api".into(),
            socket: "/model-api".into(),
        }
    }

    const EXPECTED: &str = r##"var juju_config = {
    "baseUrl": "/gui/",
    "staticURL": "/static",
    "jujuCoreVersion": "2.9.0",
    "jujuEnvUUID": "abc-123",
    "apiAddress": "wss://10.0.0.1:17070",
    "controllerSocketTemplate": "/controller-api",
    "socketTemplate": "/model-api",
    "socket_protocol": "wss",
    "charmstoreAPIPath": "v4",
    "charmstoreURL": "https://api.jujucharms.com/charmstore/",
    "bundleServiceURL": "https://api.jujucharms.com/bundleservice/",
    "plansURL": "https://api.jujucharms.com/omnibus/",
    "paymentURL": "https://api.jujucharms.com/payment/",
    "termsURL": "https://api.jujucharms.com/terms/",
    "interactiveLogin": true,
    "html5": true,
    "container": "#main",
    "viewContainer": "#main",
    "consoleEnabled": true,
    "serverRouting": false
};
"##;

    #[test]
    fn test_render_exact_output() {
        assert_eq!(render(&sample()).unwrap(), EXPECTED);
    }

    #[test]
    fn test_render_contains_substitutions() {
        let out = render(&sample()).unwrap();
        assert!(out.contains(r#""baseUrl": "/gui/""#));
        assert!(out.contains(r#""apiAddress": "wss://10.0.0.1:17070""#));
        assert!(out.contains(r#""jujuCoreVersion": "2.9.0""#));
    }

    #[test]
    fn test_each_substituted_value_appears_once() {
        let params = DeploymentParameters {
            base: "/base-x/".into(),
            static_url: "/static-x".into(),
            version: "3.1.4".into(),
            uuid: "0f1e2d3c".into(),
            host: "gui.example:443".into(),
            controller_socket: "/ctl-x".into(),
            socket: "/sock-x".into(),
        };
        let out = render(&params).unwrap();
        let api_address = params.api_address();
        for (key, value) in params.fields() {
            let value = if key == "host" { api_address.as_str() } else { value };
            let quoted = serde_json::to_string(value).unwrap();
            assert_eq!(out.matches(quoted.as_str()).count(), 1, "value {} repeated", value);
        }
    }

    #[test]
    fn test_fixed_portion_is_input_independent() {
        let other = DeploymentParameters {
            base: "/".into(),
            static_url: "https://cdn.example/static".into(),
            version: "2.0-beta1".into(),
            uuid: "ffffffff-0000-4000-8000-000000000000".into(),
            host: "controller:17070".into(),
            controller_socket: "/api".into(),
            socket: "/model/$uuid/api".into(),
        };
        let fixed = |text: String| -> Vec<String> {
            text.lines().skip(8).map(str::to_string).collect()
        };
        assert_eq!(fixed(render(&sample()).unwrap()), fixed(render(&other).unwrap()));
    }

    #[test]
    fn test_render_rejects_empty_field() {
        let params = DeploymentParameters { uuid: String::new(), ..sample() };
        match render(&params) {
            Err(RenderError::MissingField(key)) => assert_eq!(key, "uuid"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let params = DeploymentParameters {
            base: r#"/gui/"; alert(1); ""#.into(),
            socket: "C:\\sock\npath".into(),
            ..sample()
        };
        let out = render(&params).unwrap();
        assert!(out.contains(r#""baseUrl": "/gui/\"; alert(1); \"""#));
        assert!(out.contains(r#""socketTemplate": "C:\\sock\npath""#));
        assert_eq!(parse(&out).unwrap().parameters().unwrap(), params);
    }

    #[test]
    fn test_round_trip() {
        let params = sample();
        let parsed = parse(&render(&params).unwrap()).unwrap();
        assert_eq!(parsed.global, DEFAULT_GLOBAL);
        assert_eq!(parsed.parameters().unwrap(), params);
        assert!(parsed.fixed_field_mismatches().is_empty());
    }

    #[test]
    fn test_render_value_matches_text() {
        let renderer = ConfigRenderer::new();
        let value = renderer.render_value(&sample()).unwrap();
        let parsed = parse(&renderer.render(&sample()).unwrap()).unwrap();
        assert_eq!(value, parsed.to_value());

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.first().map(|k| k.as_str()), Some("baseUrl"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("serverRouting"));
        assert_eq!(keys.len(), 20);
    }

    #[test]
    fn test_custom_global() {
        let out = ConfigRenderer::with_global("guiConfig")
            .unwrap()
            .render(&sample())
            .unwrap();
        assert!(out.starts_with("var guiConfig = {\n"));
        assert_eq!(parse(&out).unwrap().global, "guiConfig");
    }

    #[test]
    fn test_invalid_global_is_rejected() {
        for name in ["", "juju config", "x = 1; var y", "1config", "var", "a.b"] {
            match ConfigRenderer::with_global(name) {
                Err(RenderError::Malformed(msg)) => assert!(msg.contains("variable name")),
                other => panic!("expected Malformed for {:?}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_every_accepted_global_round_trips() {
        for name in ["juju_config", "$cfg", "_private", "config2"] {
            let renderer = ConfigRenderer::with_global(name).unwrap();
            let parsed = parse(&renderer.render(&sample()).unwrap()).unwrap();
            assert_eq!(parsed.global, name);
            assert_eq!(parsed.parameters().unwrap(), sample());
        }
    }

    #[test]
    fn test_parse_legacy_trailing_comma() {
        let legacy = EXPECTED.replace("\"serverRouting\": false\n", "\"serverRouting\": false,\n");
        let parsed = parse(&legacy).unwrap();
        assert_eq!(parsed.parameters().unwrap(), sample());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse("juju_config = {};"), Err(RenderError::Malformed(_))));
        assert!(matches!(parse("var juju_config = {}"), Err(RenderError::Malformed(_))));
        assert!(matches!(parse("var 1x = {};"), Err(RenderError::Malformed(_))));
        assert!(matches!(parse("var juju_config = [1, 2];"), Err(RenderError::Malformed(_))));
        assert!(matches!(parse("var juju_config = {oops};"), Err(RenderError::Json(_))));
    }

    #[test]
    fn test_parameters_require_wss_address() {
        let out = render(&sample()).unwrap().replace("wss://10.0.0.1", "ws://10.0.0.1");
        let parsed = parse(&out).unwrap();
        assert!(matches!(parsed.parameters(), Err(RenderError::Malformed(_))));
    }

    #[test]
    fn test_fixed_field_mismatches() {
        let out = render(&sample())
            .unwrap()
            .replace("\"serverRouting\": false", "\"serverRouting\": true");
        let parsed = parse(&out).unwrap();
        assert_eq!(parsed.fixed_field_mismatches(), vec!["serverRouting"]);
    }
}
