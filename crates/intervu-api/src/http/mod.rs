//! HTTP/REST API layer for intervu.
//!
//! Axum-based REST API at `/api/v1/` with bearer token authentication,
//! envelope response format, CORS support, and the realtime interview
//! WebSocket.

pub mod error;
pub mod extractors;
pub mod frames;
pub mod handlers;
pub mod response;
pub mod rooms;
pub mod router;
