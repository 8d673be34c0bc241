//! Gateway: local HTTP surface over the message relay.
//!
//! `GET /api/messages` fetches from the remote API, `POST /api/messages` submits to it.
//! `GET /` is a health probe.

mod server;

pub use server::{router, run_gateway, GatewayState};
