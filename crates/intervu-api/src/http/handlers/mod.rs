//! HTTP request handlers for the REST API and realtime gateway.

pub mod feedback;
pub mod interview;
pub mod ws;
