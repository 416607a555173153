//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Resolving a free-text US city to coordinates (geocoding)
//! - The api.weather.gov client: nearest station, latest observation
//! - Unit conversion and the property formatting registry
//! - Building and rendering a report, as text or JSON
//!
//! It is used by `weather-cli`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod geocode;
pub mod http;
pub mod model;
pub mod nws;
pub mod properties;
pub mod query;
pub mod report;
pub mod states;
pub mod units;

pub use config::{Config, OutputFormat};
pub use error::WeatherError;
pub use geocode::{Geocoder, GeocoderId};
pub use model::{Location, Observation, Station};
pub use nws::{NwsClient, StationSource};
pub use properties::PropertySpec;
pub use query::CityQuery;
pub use report::{Report, WeatherService};
pub use units::UnitSystem;
