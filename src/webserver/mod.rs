//! HTTP surface: the thin transport layer over the triage pipeline
//!
//! Routes:
//! - `POST /triage/plan` - validate, plan, dispatch; returns plan + execution record
//! - `POST /feedback`    - reviewer feedback intake
//! - `GET /healthz`      - active contract version and uptime

mod server;

pub mod routes;
pub mod state;
pub mod utils;

// Public API for starting/stopping the webserver
pub use server::{shutdown, start_server};
