//! Core library for the solar weather forecast service.
//!
//! This crate defines:
//! - Configuration for the photovoltaic installation and upstream provider
//! - Abstraction over the upstream forecast gateway
//! - The forecast aggregation pipeline and solar energy estimator
//! - Public response shapes for the HTTP layer
//!
//! It is used by `solar-server`, but can also be reused by other binaries or
//! services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod model;
pub mod response;
pub mod solar;

pub use config::{Config, SolarInstallation, UpstreamConfig};
pub use error::ForecastError;
pub use forecast::ForecastService;
pub use gateway::{WeatherGateway, open_meteo::OpenMeteoGateway};
pub use model::{Coordinate, DailyRecord, ForecastResult, WeeklySummary};
pub use response::{ForecastResponse, WeeklySummaryResponse};
pub use solar::SolarEnergyEstimator;
