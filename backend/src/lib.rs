//! # jujugui-config - Juju GUI configuration script
//!
//! Renders the `juju_config` JavaScript object the Juju GUI reads at startup,
//! substituting deployment-specific values into a fixed set of fields.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ file/env/CLI │────▶│ParamsBuilder │────▶│ConfigRenderer│────▶│  config.js   │
//! │  (layered)   │     │  (merge)     │     │  (escaped)   │     │ (stdout/HTTP)│
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jujugui_config::{render, ParamsBuilder};
//!
//! let params = ParamsBuilder::from_env().build()?;
//! print!("{}", render(&params)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Deployment parameters and socket URL expansion
//! - [`params`] - Layered parameter loading
//! - [`render`] - Script rendering and parsing
//! - [`validation`] - Schema validation and parameter lint
//! - [`api`] - HTTP server and log streaming

// Core modules
pub mod error;
pub mod models;

// Parameters
pub mod params;

// Rendering
pub mod render;

// Validation
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ParamsError,
    RenderError,
    ServerError,
    ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{DeploymentParameters, FIELD_NAMES};

// =============================================================================
// Re-exports - Parameters
// =============================================================================

pub use params::{ParamsBuilder, ENV_VARS};

// =============================================================================
// Re-exports - Rendering
// =============================================================================

pub use render::{
    parse,
    render,
    ConfigRenderer,
    FixedValue,
    RenderedConfig,
    DEFAULT_GLOBAL,
    FIXED_FIELDS,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{
    check_rendered,
    is_valid_config,
    lint,
    validate_config,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
