//! HTTP surface: axum router, shared state, and route handlers.

pub mod routes;
pub mod server;
