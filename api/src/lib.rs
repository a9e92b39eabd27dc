//! HTTP boundary for CraftConnect account verification
//!
//! Exposes one-time code issuance and confirmation, signup and login over
//! actix-web. The binary in `main.rs` wires the configured adapters from
//! `cc_infra` into [`app::AppState`].

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{configure, create_app, AppState};
