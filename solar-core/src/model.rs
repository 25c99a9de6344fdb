use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ForecastError;

/// A validated geographic coordinate. Construction is the only validation
/// point: holding a `Coordinate` means the bounds check already passed, so
/// nothing downstream re-checks latitude or longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidLocation { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// One calendar day of the forecast window with its derived solar figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Estimated production in kWh for this day.
    pub solar_energy: f64,
    /// Daylight duration reported by upstream, in hours. Informational only;
    /// the energy estimate uses the sunset-minus-sunrise wall-clock span,
    /// which can differ slightly from this value.
    pub daylight_hours: f64,
}

/// Aggregated view over the forecast window. Built once per request and
/// never shared across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub daily_records: Vec<DailyRecord>,
    pub average_pressure: f64,
    /// Mean of the daily solar energy estimates, in kWh. The name is kept
    /// for compatibility with the public API even though the value is an
    /// energy average, not an average of daylight hours.
    pub average_sun_exposure: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub weather_summary: String,
}

/// Projection of [`ForecastResult`] without the per-day sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub average_pressure: f64,
    pub average_sun_exposure: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub weather_summary: String,
}

impl From<&ForecastResult> for WeeklySummary {
    fn from(forecast: &ForecastResult) -> Self {
        Self {
            average_pressure: forecast.average_pressure,
            average_sun_exposure: forecast.average_sun_exposure,
            min_temperature: forecast.min_temperature,
            max_temperature: forecast.max_temperature,
            weather_summary: forecast.weather_summary.clone(),
        }
    }
}
