//! Core library for `zipweather`.
//!
//! This crate defines:
//! - Configuration handling
//! - Upstream clients (OpenDataSoft geocoding, api.weather.gov stations and observations)
//! - The zip code lookup that chains them together
//! - Shared domain models and the error taxonomy
//!
//! It is used by `zipweather-web`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
mod extract;
pub mod fetch;
pub mod lookup;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::LookupError;
pub use fetch::{HttpJsonFetcher, JsonFetcher};
pub use lookup::LookupService;
pub use model::{Location, LookupResult, Observation};
