//! Core library for the weather API.
//!
//! This crate defines:
//! - Settings loading (defaults, TOML file, environment)
//! - The read-only city catalog and shared domain models
//! - The heat index calculator
//! - `WeatherService`, the entry point used by the HTTP layer and the CLI
//!
//! Nothing here knows about HTTP; failures are reported as [`WeatherError`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod heat_index;
pub mod model;
pub mod service;

pub use catalog::Catalog;
pub use config::Settings;
pub use error::WeatherError;
pub use model::{Condition, ServiceInfo, WeatherRecord, WeatherReport};
pub use service::WeatherService;
