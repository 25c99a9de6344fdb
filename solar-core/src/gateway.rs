use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{error::ForecastError, model::Coordinate};

pub mod open_meteo;

/// Raw daily forecast payload as returned by the upstream provider.
///
/// Every field is optional on purpose: the pipeline distinguishes a missing
/// top-level series (external-service failure) from a missing field inside
/// it (data-processing failure), so nothing may be silently defaulted at
/// deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeatherPayload {
    pub daily: Option<DailySeries>,
}

/// Parallel arrays indexed by day. Array lengths are validated by the
/// pipeline, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeries {
    pub time: Option<Vec<String>>,
    pub weathercode: Option<Vec<i32>>,
    pub temperature_2m_max: Option<Vec<f64>>,
    pub temperature_2m_min: Option<Vec<f64>>,
    pub sunrise: Option<Vec<String>>,
    pub sunset: Option<Vec<String>>,
    pub daylight_duration: Option<Vec<f64>>,
}

/// Raw hourly pressure payload as returned by the upstream provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPressurePayload {
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlySeries {
    /// Mean sea-level pressure readings in millibars, one per hour.
    pub pressure_msl: Option<Vec<f64>>,
}

/// Access to the upstream forecast provider.
///
/// The aggregation pipeline only depends on this trait, so tests substitute
/// an implementation returning canned payloads instead of touching the
/// network.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    /// Fetch the 7-day daily series for a coordinate.
    async fn fetch_daily_forecast(
        &self,
        location: Coordinate,
    ) -> Result<RawWeatherPayload, ForecastError>;

    /// Fetch the hourly mean sea-level pressure series over the same window.
    async fn fetch_hourly_pressure(
        &self,
        location: Coordinate,
    ) -> Result<RawPressurePayload, ForecastError>;
}
