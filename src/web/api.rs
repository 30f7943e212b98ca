//! JSON API handlers for the dashboard.
//!
//! Each handler corresponds to an API endpoint and returns an
//! [`ApiResponse`] or an [`ApiError`]; the router turns either into an HTTP
//! response.

use serde::Serialize;

use crate::dashboard::{self, DashboardView};
use crate::error::ApiError;
use crate::telemetry::{NewReading, ReadingPatch};

use super::{ApiResponse, AppState};

/// Summary returned by the validation error for bad telemetry bodies.
pub const INVALID_TELEMETRY: &str = "Invalid transmitter data";

/// Defaults for the meter design gallery.
const GALLERY_VALUE: f64 = 1500.0;
const GALLERY_MIN: f64 = 0.0;
const GALLERY_MAX: f64 = 2000.0;

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Health API response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    readings: usize,
    generators: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Raw value of query parameter `key`, if present.
pub(crate) fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Numeric query parameter with a default. Present but unparseable is an
/// error rather than silently falling back.
fn number_param(url: &str, key: &str, default: f64) -> Result<f64, ApiError> {
    match query_param(url, key) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                ApiError::validation(
                    "Invalid query parameter",
                    format!("'{key}' must be a number, got '{raw}'"),
                )
            }),
    }
}

fn parse_body<'a, T: serde::Deserialize<'a>>(body: Option<&'a str>) -> Result<T, ApiError> {
    let body = body.unwrap_or("");
    serde_json::from_str(body).map_err(|e| ApiError::validation(INVALID_TELEMETRY, e.to_string()))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/transmitter/data`: the most recent reading.
pub fn get_transmitter_data(state: &AppState) -> Result<ApiResponse, ApiError> {
    match state.store.latest()? {
        Some(reading) => ApiResponse::json(200, &reading),
        None => Err(ApiError::not_found("Transmitter data not found")),
    }
}

/// `POST /api/transmitter/settings`: validate and store a new reading.
pub fn post_transmitter_settings(
    state: &AppState,
    body: Option<&str>,
) -> Result<ApiResponse, ApiError> {
    let reading: NewReading = parse_body(body)?;
    reading
        .validate()
        .map_err(|detail| ApiError::validation(INVALID_TELEMETRY, detail))?;
    let created = state.store.create(reading)?;
    ApiResponse::json(200, &created)
}

/// `PATCH /api/transmitter/data/{id}`: merge fields into an existing reading.
pub fn patch_transmitter_data(
    state: &AppState,
    id: &str,
    body: Option<&str>,
) -> Result<ApiResponse, ApiError> {
    let not_found = || ApiError::not_found(format!("No transmitter data with id {id}"));
    let id: u64 = id.parse().map_err(|_| not_found())?;
    let patch: ReadingPatch = parse_body(body)?;
    match state.store.update(id, &patch)? {
        Some(updated) => ApiResponse::json(200, &updated),
        None => Err(not_found()),
    }
}

/// `GET /api/dashboard`: every gauge on the page.
pub fn get_dashboard(state: &AppState) -> Result<ApiResponse, ApiError> {
    let reading = state.store.latest()?;
    let view = DashboardView::build(reading, &state.snapshots(), &state.device)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    ApiResponse::json(200, &view)
}

/// `GET /api/designs?value=V&min=A&max=B`: one value in every meter design.
pub fn get_designs(url: &str) -> Result<ApiResponse, ApiError> {
    let value = number_param(url, "value", GALLERY_VALUE)?;
    let min = number_param(url, "min", GALLERY_MIN)?;
    let max = number_param(url, "max", GALLERY_MAX)?;
    let gallery = dashboard::designs(value, min, max)?;
    ApiResponse::json(200, &gallery)
}

/// `GET /api/health`: store size and running generators.
pub fn get_health(state: &AppState) -> Result<ApiResponse, ApiError> {
    let resp = HealthResponse {
        status: "ok",
        readings: state.store.len(),
        generators: state
            .simulation
            .as_ref()
            .map(|s| s.running())
            .unwrap_or_default(),
    };
    ApiResponse::json(200, &resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
