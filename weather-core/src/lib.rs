//! Client for the AMap (Gaode) weather API.
//!
//! This crate defines:
//! - [`WeatherClient`], which validates a query, sends it and decodes the answer
//! - The [`Transport`] abstraction and its `reqwest` implementation
//! - Query/result models and a typed view of the provider payload
//! - Configuration & credentials handling
//!
//! It is used by the `amap-weather` binary, but can also be embedded in other
//! binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod transport;

pub use client::{ENDPOINT, WeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{QueryType, ResponseFormat, WeatherQuery, WeatherResult};
pub use report::{Cast, Forecast, LiveWeather, WeatherReport};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportOptions};
