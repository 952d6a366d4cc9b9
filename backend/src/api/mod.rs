//! HTTP API: axum server, wire types and the SSE log broadcaster.

pub mod logs;
pub mod server;
pub mod types;
