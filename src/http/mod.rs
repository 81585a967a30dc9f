//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the proxy endpoint
//! - Segment pass-through and playlist discovery handler
//! - Health and version endpoints
//! - CORS middleware

pub mod handlers;
pub mod routes;

pub use routes::create_router;
