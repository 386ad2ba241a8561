//! HTTP API module.
//!
//! Serves the rendered configuration script and streams logs.

pub mod server;
pub mod types;
pub mod logs;

pub use server::{router, start_server, AppState};
pub use types::*;
pub use logs::*;
