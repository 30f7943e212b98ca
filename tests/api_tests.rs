/// End-to-end tests for the HTTP API.
///
/// Each test binds its own server on an ephemeral port, serves it from a
/// background thread and talks to it with `ureq`.
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};
use txdash::telemetry::{NewReading, TelemetryStore};
use txdash::web::{self, AppState, INVALID_TELEMETRY};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn start(state: AppState) -> String {
    let server = web::bind("127.0.0.1:0").unwrap();
    let addr = web::local_addr(&server).unwrap();
    thread::spawn(move || web::serve(&server, &state));
    let base = format!("http://{addr}");
    wait_for_server(&base);
    base
}

fn start_seeded() -> String {
    start(AppState::without_simulation(
        TelemetryStore::seeded(NewReading::seed()).unwrap(),
    ))
}

fn wait_for_server(base: &str) {
    for _ in 0..80 {
        if ureq::get(&format!("{base}/api/health")).call().is_ok() {
            return;
        }
        thread::sleep(Duration::from_millis(25));
    }
    panic!("dashboard server did not become reachable at {base}");
}

fn get_json(url: &str) -> Value {
    ureq::get(url).call().unwrap().into_json().unwrap()
}

/// Status code and JSON body of a request expected to fail.
fn error_of(result: Result<ureq::Response, ureq::Error>) -> (u16, Value) {
    match result {
        Err(ureq::Error::Status(code, resp)) => (code, resp.into_json().unwrap()),
        Err(e) => panic!("transport error: {e}"),
        Ok(resp) => panic!("expected an error status, got {}", resp.status()),
    }
}

// ---------------------------------------------------------------------------
// Telemetry endpoints
// ---------------------------------------------------------------------------

#[test]
fn fresh_server_serves_seed_reading() {
    let base = start_seeded();
    let json = get_json(&format!("{base}/api/transmitter/data"));
    assert_eq!(json["id"], 1);
    assert_eq!(json["forwardPower"], 2700.0);
    assert_eq!(json["reflectedPower"], 12.0);
    assert_eq!(json["frequency"], 93.4);
    assert_eq!(json["isOnAir"], true);
    assert!(json["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn empty_store_is_not_found() {
    let base = start(AppState::without_simulation(TelemetryStore::new()));
    let (code, body) = error_of(ureq::get(&format!("{base}/api/transmitter/data")).call());
    assert_eq!(code, 404);
    assert_eq!(body["message"], "Transmitter data not found");
}

#[test]
fn posted_reading_becomes_latest() {
    let base = start_seeded();
    let created: Value = ureq::post(&format!("{base}/api/transmitter/settings"))
        .send_json(json!({
            "forwardPower": 1950,
            "reflectedPower": 20,
            "frequency": 99.9,
            "rfEfficiency": 91,
            "targetPower": 2000,
            "isOnAir": false
        }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(created["id"], 2);

    let latest = get_json(&format!("{base}/api/transmitter/data"));
    assert_eq!(latest["id"], 2);
    assert_eq!(latest["forwardPower"], 1950.0);
    assert_eq!(latest["isOnAir"], false);
}

#[test]
fn malformed_post_is_rejected() {
    let base = start_seeded();
    let (code, body) = error_of(
        ureq::post(&format!("{base}/api/transmitter/settings"))
            .set("Content-Type", "application/json")
            .send_string(r#"{"forwardPower":"high"}"#),
    );
    assert_eq!(code, 400);
    assert_eq!(body["message"], INVALID_TELEMETRY);
    assert!(body["detail"].is_string());

    // The store is unchanged.
    let latest = get_json(&format!("{base}/api/transmitter/data"));
    assert_eq!(latest["id"], 1);
}

#[test]
fn patch_merges_fields() {
    let base = start_seeded();
    let updated: Value = ureq::request("PATCH", &format!("{base}/api/transmitter/data/1"))
        .send_json(json!({ "reflectedPower": 30 }))
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(updated["reflectedPower"], 30.0);
    assert_eq!(updated["forwardPower"], 2700.0);

    let latest = get_json(&format!("{base}/api/transmitter/data"));
    assert_eq!(latest["reflectedPower"], 30.0);
}

#[test]
fn patch_unknown_id_is_not_found() {
    let base = start_seeded();
    let (code, _) = error_of(
        ureq::request("PATCH", &format!("{base}/api/transmitter/data/99"))
            .send_json(json!({ "isOnAir": false })),
    );
    assert_eq!(code, 404);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[test]
fn dashboard_view_describes_every_panel() {
    let base = start_seeded();
    let json = get_json(&format!("{base}/api/dashboard"));
    assert_eq!(json["loading"], false);
    assert_eq!(json["telemetry"]["banner"]["text"], "ON AIR");
    assert_eq!(json["telemetry"]["forwardPower"]["filled"], 40);
    assert_eq!(json["audio"].as_array().unwrap().len(), 3);
    assert_eq!(json["temperatures"].as_array().unwrap().len(), 4);
    assert!(json["fm"]["waveformPath"].is_string());
}

#[test]
fn designs_accept_query_parameters() {
    let base = start_seeded();
    let json = get_json(&format!("{base}/api/designs?value=50&min=0&max=100"));
    assert_eq!(json["digitalBar"]["filled"], 20);
    assert_eq!(json["lcd"]["display"], "0050W");

    let (code, _) = error_of(ureq::get(&format!("{base}/api/designs?min=5&max=1")).call());
    assert_eq!(code, 400);
}

#[test]
fn health_and_frontend_are_served() {
    let base = start_seeded();
    let health = get_json(&format!("{base}/api/health"));
    assert_eq!(health["status"], "ok");
    assert_eq!(health["readings"], 1);

    let page = ureq::get(&format!("{base}/")).call().unwrap();
    assert!(page.content_type().starts_with("text/html"));
    assert!(page.into_string().unwrap().contains("Loading transmitter data"));
}

#[test]
fn unknown_route_is_not_found() {
    let base = start_seeded();
    let (code, body) = error_of(ureq::get(&format!("{base}/api/unknown")).call());
    assert_eq!(code, 404);
    assert!(body["message"].as_str().unwrap().contains("/api/unknown"));
}
