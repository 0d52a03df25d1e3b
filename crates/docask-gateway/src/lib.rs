//! # DocAsk Gateway
//!
//! HTTP and WebSocket surface for document upload, lifecycle and question
//! answering. Rate limiting is applied before any document or answer work and
//! is shared between the HTTP and WebSocket paths.

pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod ws;

pub use server::{AppState, build_router, start};
