//! API Module
//!
//! HTTP handlers and routing for the review server REST API.
//!
//! # Endpoints
//! - `/teachers`, `/subjects`, `/users`, `/reviews` - resource CRUD and lookups
//! - `GET /cache/stats` - Get cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
