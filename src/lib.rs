//! txdash: an FM transmitter telemetry dashboard.
//!
//! Simulated telemetry and signal generators feed an in-memory store; a
//! small HTTP server exposes the readings and the gauge geometry the
//! browser page draws.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gauge;
pub mod logging;
pub mod simulation;
pub mod telemetry;
pub mod web;
