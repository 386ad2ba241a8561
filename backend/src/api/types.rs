//! REST API response types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Juju core version the served configuration targets
    pub juju_core_version: String,
    /// Model UUID the served configuration points at
    #[serde(rename = "jujuEnvUUID")]
    pub juju_env_uuid: String,
    pub endpoints: Vec<String>,
}

impl HealthResponse {
    pub fn ok(juju_core_version: &str, juju_env_uuid: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: "jujugui-config".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            juju_core_version: juju_core_version.to_string(),
            juju_env_uuid: juju_env_uuid.to_string(),
            endpoints: vec![
                "GET /config.js".to_string(),
                "GET /config.json".to_string(),
                "GET /api/logs (SSE)".to_string(),
            ],
        }
    }
}

/// Create an error response body
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}
