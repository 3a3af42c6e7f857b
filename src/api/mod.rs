//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /health` - Store health check
//! - `POST /redisson/*` - Demo calls
//! - `/bucket`, `/bits`, `/atomic`, `/map`, `/set`, `/sorted-set`,
//!   `/scored-set`, `/list`, `/queue`, `/adder` - One resource per object type

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
