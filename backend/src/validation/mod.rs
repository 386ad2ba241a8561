//! Validation of rendered configuration and advisory parameter checks.
//!
//! # Schema validation
//!
//! The configuration object is checked against an embedded JSON Schema
//! (Draft 7) from `schemas/juju-config.json`. The schema requires every key
//! and pins each constant field with `const`.
//!
//! # Lint
//!
//! [`lint`] looks at [`DeploymentParameters`] and returns warnings for values
//! that render fine but are probably wrong (a UUID that is not a UUID, a host
//! without a port). Warnings never stop a render.
//!
//! # Example
//!
//! ```rust,ignore
//! use jujugui_config::{check_rendered, lint};
//!
//! for warning in lint(&params) {
//!     eprintln!("warning: {}", warning);
//! }
//! let config = check_rendered(&script)?;
//! ```

use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::models::DeploymentParameters;
use crate::render::{parse, RenderedConfig};

const CONFIG_SCHEMA: &str = include_str!("../../schemas/juju-config.json");

/// Validate a JSON value against a JSON schema.
///
/// Returns every error message when invalid.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Boolean form of [`validate`].
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

fn config_schema() -> Result<Value, Vec<String>> {
    serde_json::from_str(CONFIG_SCHEMA).map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate a configuration object against the embedded schema.
pub fn validate_config(data: &Value) -> Result<(), Vec<String>> {
    let schema = config_schema()?;
    validate(&schema, data)
}

/// Quick check against the embedded schema.
pub fn is_valid_config(data: &Value) -> bool {
    config_schema().is_ok_and(|schema| is_valid(&schema, data))
}

/// Parse a rendered script and validate its object.
pub fn check_rendered(text: &str) -> ValidationResult<RenderedConfig> {
    let config = parse(text)?;
    validate_config(&config.to_value())
        .map_err(|errors| ValidationError::SchemaError { errors })?;
    Ok(config)
}

/// Advisory warnings about parameter values.
pub fn lint(params: &DeploymentParameters) -> Vec<String> {
    let mut warnings = Vec::new();

    if !params.base.starts_with('/') {
        warnings.push(format!("base '{}' does not start with '/'", params.base));
    }

    if uuid::Uuid::parse_str(&params.uuid).is_err() {
        warnings.push(format!("uuid '{}' is not a valid UUID", params.uuid));
    }

    if !matches(r"^(\[[0-9A-Fa-f:.]+\]|[A-Za-z0-9.\-]+):[0-9]{1,5}$", &params.host) {
        warnings.push(format!("host '{}' is not in hostname:port form", params.host));
    } else if let (_, Some(port)) = params.server_and_port() {
        if port.parse::<u16>().map_or(true, |p| p == 0) {
            warnings.push(format!("host '{}' has an invalid port", params.host));
        }
    }

    if !matches(r"^\d+\.\d+(\.\d+)?([.\-+][0-9A-Za-z.\-]+)?$", &params.version) {
        warnings.push(format!("version '{}' is not a Juju version number", params.version));
    }

    for (key, template) in [
        ("controllerSocket", &params.controller_socket),
        ("socket", &params.socket),
    ] {
        if !template.starts_with('/') && !template.starts_with("wss://") {
            warnings.push(format!(
                "{} '{}' is neither a path nor a wss:// URL",
                key, template
            ));
        }
    }

    warnings
}

fn matches(pattern: &str, value: &str) -> bool {
    regex::Regex::new(pattern)
        .ok()
        .is_some_and(|re| re.is_match(value))
}
