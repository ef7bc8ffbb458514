//! HTTP boundary for the weather API.
//!
//! This crate focuses on:
//! - Mapping `weather-core` operations onto HTTP routes
//! - Translating core failures into status codes and JSON bodies
//! - Running the server and initializing logging

pub mod logging;
pub mod routes;
pub mod server;

pub use routes::router;
pub use server::serve;
