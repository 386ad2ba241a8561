//! HTTP server for the GUI configuration script.
//!
//! The GUI page loads `/config.js` before the application bundle; the
//! script is rendered per request from one immutable set of parameters.
//!
//! # API Endpoints
//!
//! | Method | Path           | Description                          |
//! |--------|----------------|--------------------------------------|
//! | GET    | `/health`      | Health check                         |
//! | GET    | `/config.js`   | Rendered `juju_config` script        |
//! | GET    | `/config.json` | Configuration object as JSON         |
//! | GET    | `/api/logs`    | SSE stream for real-time logs        |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::Value;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::types::{error_response, HealthResponse};
use crate::error::ServerResult;
use crate::models::DeploymentParameters;
use crate::render::ConfigRenderer;

const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    params: Arc<DeploymentParameters>,
    renderer: Arc<ConfigRenderer>,
}

impl AppState {
    pub fn new(params: DeploymentParameters, renderer: ConfigRenderer) -> Self {
        Self {
            params: Arc::new(params),
            renderer: Arc::new(renderer),
        }
    }

    pub fn params(&self) -> &DeploymentParameters {
        &self.params
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/config.js", get(config_js))
        .route("/config.json", get(config_json))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
///
/// The parameters are rendered once up front so a bad configuration fails
/// at startup rather than on the first request.
pub async fn start_server(port: u16, state: AppState) -> ServerResult<()> {
    state.renderer.render(&state.params)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_success(format!("GUI config server running on http://localhost:{}", port));
    log_info("GET  /config.js   - juju_config script");
    log_info("GET  /config.json - configuration as JSON");
    log_info("GET  /api/logs    - SSE log stream");
    log_info("GET  /health      - Health check");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(&state.params.version, &state.params.uuid))
}

/// Rendered configuration script
async fn config_js(State(state): State<AppState>) -> Result<Response, (StatusCode, Json<Value>)> {
    let request_id = Uuid::new_v4();

    let script = state.renderer.render(&state.params).map_err(|e| {
        log_error(format!("[{}] render failed: {}", request_id, e));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })?;

    log_info(format!("[{}] GET /config.js ({} bytes)", request_id, script.len()));

    Ok((
        [
            (header::CONTENT_TYPE, JAVASCRIPT_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        script,
    )
        .into_response())
}

/// Configuration object as JSON
async fn config_json(State(state): State<AppState>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .renderer
        .render_value(&state.params)
        .map(Json)
        .map_err(|e| {
            log_error(format!("render failed: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
        })
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged receivers skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::parse;

    fn state() -> AppState {
        AppState::new(
            DeploymentParameters {
                base: "/gui/".into(),
                static_url: "/static".into(),
                version: "2.9.0".into(),
                uuid: "abc-123".into(),
                host: "10.0.0.1:17070".into(),
                controller_socket: "/api".into(),
                socket: "/model/$uuid/api".into(),
            },
            ConfigRenderer::new(),
        )
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_config_js() {
        let response = config_js(State(state())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            JAVASCRIPT_CONTENT_TYPE
        );

        let body = body_string(response).await;
        let parsed = parse(&body).unwrap();
        assert_eq!(&parsed.parameters().unwrap(), state().params());
    }

    #[tokio::test]
    async fn test_config_json() {
        let Json(value) = config_json(State(state())).await.unwrap();
        assert_eq!(value["apiAddress"], "wss://10.0.0.1:17070");
        assert_eq!(value["serverRouting"], false);
    }

    #[tokio::test]
    async fn test_config_js_render_failure() {
        let mut params = state().params().clone();
        params.socket.clear();
        let broken = AppState::new(params, ConfigRenderer::new());

        let (status, Json(body)) = config_js(State(broken)).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Missing required field: socket");
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health(State(state())).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.juju_core_version, "2.9.0");
    }

    #[tokio::test]
    async fn test_start_server_rejects_incomplete_params() {
        let mut params = state().params().clone();
        params.host.clear();
        let result = start_server(0, AppState::new(params, ConfigRenderer::new())).await;
        assert!(matches!(result, Err(crate::error::ServerError::Render(_))));
    }
}
