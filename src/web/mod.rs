//! HTTP server for the transmitter dashboard.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page dashboard
//! - JSON API endpoints for telemetry, the composed dashboard view, the
//!   meter design gallery and health
//!
//! Launched via `txdash serve` (default: `http://127.0.0.1:5000`).

mod api;
mod frontend;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{error, info, warn};

use crate::config::TxdashConfig;
use crate::config::schema::DeviceConfig;
use crate::error::ApiError;
use crate::simulation::{Simulation, Snapshots};
use crate::telemetry::TelemetryStore;

pub use api::INVALID_TELEMETRY;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything the handlers read from.
pub struct AppState {
    pub store: Arc<TelemetryStore>,
    /// Running generators; `None` when simulation is disabled.
    pub simulation: Option<Simulation>,
    pub device: DeviceConfig,
}

impl AppState {
    /// Seed the store from `config` and start the generators it enables.
    pub fn from_config(config: &TxdashConfig) -> Result<Self> {
        let store = Arc::new(
            TelemetryStore::seeded(config.seed.to_reading())
                .context("failed to seed telemetry store")?,
        );
        let simulation = if config.simulation.enabled {
            Some(Simulation::start(
                &config.simulation,
                &config.drift,
                Arc::clone(&store),
            )?)
        } else {
            None
        };
        Ok(Self {
            store,
            simulation,
            device: config.device.clone(),
        })
    }

    /// State over an existing store with no generators running.
    pub fn without_simulation(store: TelemetryStore) -> Self {
        Self {
            store: Arc::new(store),
            simulation: None,
            device: DeviceConfig::default(),
        }
    }

    /// Current generator values, or their defaults when none are running.
    pub fn snapshots(&self) -> Snapshots {
        self.simulation
            .as_ref()
            .map(Simulation::snapshots)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A handler's answer before it is written to the socket.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

impl ApiResponse {
    /// Serialize `data` as the JSON body.
    pub fn json<T: Serialize>(status: u16, data: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(data)
            .map_err(|e| ApiError::Internal(format!("failed to serialize response: {e}")))?;
        Ok(Self {
            status,
            content_type: JSON,
            body,
        })
    }

    fn html(html: &str) -> Self {
        Self {
            status: 200,
            content_type: HTML,
            body: html.as_bytes().to_vec(),
        }
    }

    /// JSON error body for `err`. Internal causes are logged, not returned.
    pub fn from_error(err: &ApiError) -> Self {
        if let ApiError::Internal(cause) = err {
            error!(%cause, "request failed");
        }
        let body = serde_json::to_vec(&err.body())
            .unwrap_or_else(|_| br#"{"message":"Internal server error"}"#.to_vec());
        Self {
            status: err.status(),
            content_type: JSON,
            body,
        }
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut resp = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Ok(header) = Header::from_bytes("Content-Type", self.content_type) {
            resp = resp.with_header(header);
        }
        resp
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Bind the HTTP listener. Use port 0 to let the OS pick one.
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))
}

/// Address the server actually listens on.
pub fn local_addr(server: &Server) -> Option<SocketAddr> {
    server.server_addr().to_ip()
}

/// Seed the store, start the generators and serve until the process ends.
pub fn run(config: &TxdashConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let server = bind(&config.server.addr)?;
    let addr = local_addr(&server)
        .map(|a| a.to_string())
        .unwrap_or_else(|| config.server.addr.clone());
    let url = format!("http://{addr}");

    println!("txdash dashboard running at {url}");
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser
        && let Err(e) = open_browser(&url)
    {
        warn!(error = %e, "could not open browser");
    }

    serve(&server, &state);
    Ok(())
}

/// Answer requests until the listener shuts down.
///
/// Requests are handled sequentially; a failing request never stops the
/// loop.
pub fn serve(server: &Server, state: &AppState) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            match request.as_reader().read_to_string(&mut buf) {
                Ok(_) => Some(buf),
                Err(e) => {
                    warn!(error = %e, "failed to read request body");
                    None
                }
            }
        } else {
            None
        };

        let resp = dispatch(state, &method, &url, body.as_deref());
        let status = resp.status;

        if let Err(e) = request.respond(resp.into_response()) {
            warn!(error = %e, "failed to send response");
        }

        info!(%method, url = %url, status, "request");
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route one request to its handler.
pub fn dispatch(state: &AppState, method: &Method, url: &str, body: Option<&str>) -> ApiResponse {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    let result = match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(ApiResponse::html(frontend::INDEX_HTML))
        }

        // API: telemetry
        (&Method::Get, "/api/transmitter/data") => api::get_transmitter_data(state),
        (&Method::Post, "/api/transmitter/settings") => api::post_transmitter_settings(state, body),
        (&Method::Patch, p) if p.starts_with("/api/transmitter/data/") => {
            let id = &p["/api/transmitter/data/".len()..];
            api::patch_transmitter_data(state, id, body)
        }

        // API: views
        (&Method::Get, "/api/dashboard") => api::get_dashboard(state),
        (&Method::Get, "/api/designs") => api::get_designs(url),
        (&Method::Get, "/api/health") => api::get_health(state),

        // 404
        _ => Err(ApiError::not_found(format!("No route for {method} {path}"))),
    };

    result.unwrap_or_else(|e| ApiResponse::from_error(&e))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::NewReading;

    fn state() -> AppState {
        AppState::without_simulation(TelemetryStore::seeded(NewReading::seed()).unwrap())
    }

    #[test]
    fn root_serves_html() {
        let resp = dispatch(&state(), &Method::Get, "/", None);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, HTML);
        assert!(String::from_utf8(resp.body).unwrap().contains("<!DOCTYPE html>"));
    }

    #[test]
    fn unknown_route_is_json_404() {
        let resp = dispatch(&state(), &Method::Get, "/api/nope", None);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.content_type, JSON);
        let json: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("/api/nope"));
    }

    #[test]
    fn wrong_method_is_404() {
        let resp = dispatch(&state(), &Method::Delete, "/api/transmitter/data", None);
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn query_string_does_not_affect_routing() {
        let resp = dispatch(&state(), &Method::Get, "/api/transmitter/data?x=1", None);
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn patch_route_extracts_id() {
        let resp = dispatch(
            &state(),
            &Method::Patch,
            "/api/transmitter/data/1",
            Some(r#"{"frequency":100.0}"#),
        );
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn internal_error_body_is_generic() {
        let resp = ApiResponse::from_error(&ApiError::Internal("disk on fire".into()));
        assert_eq!(resp.status, 500);
        let text = String::from_utf8(resp.body).unwrap();
        assert!(!text.contains("disk on fire"));
    }

    #[test]
    fn snapshots_default_without_simulation() {
        assert_eq!(state().snapshots(), Snapshots::default());
    }
}
