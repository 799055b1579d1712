//! # HTTP Server Module
//!
//! Axum routers for the service, combined by [`HttpServer`].
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/items/*` - Item CRUD, filter and aggregation
//! - `/clock-in/*` - Clock-in CRUD and filter

mod clock_in_routes;
mod extract;
mod health_routes;
mod item_routes;
pub mod response;
pub mod server;
pub mod state;

pub use server::{build_router, HttpServer};
pub use state::AppState;
