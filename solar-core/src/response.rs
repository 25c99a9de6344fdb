//! Public wire shapes for the two read endpoints.
//!
//! Pure field mapping from the internal aggregation results; no logic and
//! no failure modes live here.

use serde::Serialize;

use crate::model::{DailyRecord, ForecastResult, WeeklySummary};

/// Body of `GET /forecast`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub daily_forecasts: Vec<DailyRecord>,
    pub average_pressure: f64,
    /// Mean of the daily solar energy estimates (kWh); the field name is
    /// historical and kept for client compatibility.
    pub average_sun_exposure: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub weather_summary: String,
}

impl From<ForecastResult> for ForecastResponse {
    fn from(result: ForecastResult) -> Self {
        Self {
            daily_forecasts: result.daily_records,
            average_pressure: result.average_pressure,
            average_sun_exposure: result.average_sun_exposure,
            min_temperature: result.min_temperature,
            max_temperature: result.max_temperature,
            weather_summary: result.weather_summary,
        }
    }
}

/// Body of `GET /summary`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryResponse {
    pub average_pressure: f64,
    pub average_sun_exposure: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Always null. Clients of the reference system expect the field to be
    /// present even though it was never populated there.
    pub weather_description: Option<String>,
    pub weather_summary: String,
}

impl From<WeeklySummary> for WeeklySummaryResponse {
    fn from(summary: WeeklySummary) -> Self {
        Self {
            average_pressure: summary.average_pressure,
            average_sun_exposure: summary.average_sun_exposure,
            min_temperature: summary.min_temperature,
            max_temperature: summary.max_temperature,
            weather_description: None,
            weather_summary: summary.weather_summary,
        }
    }
}
