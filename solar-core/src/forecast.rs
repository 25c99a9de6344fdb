use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::{
    error::ForecastError,
    gateway::{DailySeries, WeatherGateway},
    model::{Coordinate, DailyRecord, ForecastResult, WeeklySummary},
    solar::SolarEnergyEstimator,
};

/// Size of the forecast window in days. Upstream is asked for exactly this
/// many; a longer series is truncated to it.
pub const FORECAST_DAYS: usize = 7;

/// Categorical summary when more than [`RAINY_DAYS_THRESHOLD`] days carry a
/// precipitation weather code.
pub const SUMMARY_MOSTLY_WET: &str = "Rain expected on most days";
pub const SUMMARY_MOSTLY_DRY: &str = "Mostly dry";

/// WMO weather codes in this range indicate precipitation.
const PRECIPITATION_CODES: std::ops::RangeInclusive<i32> = 50..=69;
const RAINY_DAYS_THRESHOLD: usize = 3;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The forecast aggregation pipeline.
///
/// Each call runs a linear sequence: validate, fetch both upstream series,
/// parse the daily arrays day by day, estimate solar energy per day, reduce
/// to weekly aggregates. Any step failing aborts the whole request; there is
/// no retry and never a partial result.
#[derive(Debug, Clone)]
pub struct ForecastService {
    gateway: Arc<dyn WeatherGateway>,
    estimator: SolarEnergyEstimator,
}

impl ForecastService {
    pub fn new(gateway: Arc<dyn WeatherGateway>, estimator: SolarEnergyEstimator) -> Self {
        Self { gateway, estimator }
    }

    /// Full 7-day forecast with per-day records and weekly aggregates.
    #[instrument(skip(self))]
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResult, ForecastError> {
        self.run_pipeline(latitude, longitude).await.inspect_err(|e| {
            error!(lat = latitude, lon = longitude, error = %e, "forecast request failed");
        })
    }

    /// Weekly aggregates only; runs the same pipeline and drops the per-day
    /// sequence.
    pub async fn get_weekly_summary(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeeklySummary, ForecastError> {
        let forecast = self.get_forecast(latitude, longitude).await?;
        Ok(WeeklySummary::from(&forecast))
    }

    async fn run_pipeline(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResult, ForecastError> {
        let location = Coordinate::new(latitude, longitude)?;

        // The two series have no data dependency on each other.
        let (weather, pressure) = tokio::join!(
            self.gateway.fetch_daily_forecast(location),
            self.gateway.fetch_hourly_pressure(location),
        );

        let daily = weather?.daily.ok_or_else(|| {
            ForecastError::MalformedPayload("weather payload is missing the `daily` series".into())
        })?;
        let hourly = pressure?.hourly.ok_or_else(|| {
            ForecastError::MalformedPayload("pressure payload is missing the `hourly` series".into())
        })?;

        let records = self.parse_daily_records(&daily)?;
        let average_pressure = average_pressure(&hourly.pressure_msl)?;

        let result = reduce(records, average_pressure)?;
        info!(
            days = result.daily_records.len(),
            summary = %result.weather_summary,
            "forecast assembled"
        );
        Ok(result)
    }

    /// Parse the parallel daily arrays into one record per day, estimating
    /// solar energy as it goes. One bad day fails the whole window.
    fn parse_daily_records(&self, series: &DailySeries) -> Result<Vec<DailyRecord>, ForecastError> {
        let time = require_field(&series.time, "time")?;
        let codes = require_field(&series.weathercode, "weathercode")?;
        let max_temps = require_field(&series.temperature_2m_max, "temperature_2m_max")?;
        let min_temps = require_field(&series.temperature_2m_min, "temperature_2m_min")?;
        let sunrises = require_field(&series.sunrise, "sunrise")?;
        let sunsets = require_field(&series.sunset, "sunset")?;
        let daylight = require_field(&series.daylight_duration, "daylight_duration")?;

        let days = time.len().min(FORECAST_DAYS);
        let mut records = Vec::with_capacity(days);

        for i in 0..days {
            let date = parse_date(day_entry(time, i, "time")?, i)?;
            let weather_code = *day_entry(codes, i, "weathercode")?;
            let max_temperature = *day_entry(max_temps, i, "temperature_2m_max")?;
            let min_temperature = *day_entry(min_temps, i, "temperature_2m_min")?;
            let sunrise = parse_time_of_day(day_entry(sunrises, i, "sunrise")?, "sunrise", i)?;
            let sunset = parse_time_of_day(day_entry(sunsets, i, "sunset")?, "sunset", i)?;
            let daylight_hours = *day_entry(daylight, i, "daylight_duration")? / SECONDS_PER_HOUR;

            // Wall-clock span between sunrise and sunset feeds the energy
            // estimate; the reported daylight duration is kept as a separate
            // informational field.
            let sun_exposure_hours = (sunset - sunrise).num_seconds() as f64 / SECONDS_PER_HOUR;
            let solar_energy = self.estimator.estimate_daily(sun_exposure_hours)?;

            records.push(DailyRecord {
                date,
                weather_code,
                min_temperature,
                max_temperature,
                solar_energy,
                daylight_hours,
            });
        }

        Ok(records)
    }
}

fn require_field<'a, T>(
    field: &'a Option<Vec<T>>,
    name: &str,
) -> Result<&'a Vec<T>, ForecastError> {
    field.as_ref().ok_or_else(|| {
        ForecastError::DataProcessing(format!("daily series is missing required field `{name}`"))
    })
}

fn day_entry<'a, T>(values: &'a [T], index: usize, name: &str) -> Result<&'a T, ForecastError> {
    values.get(index).ok_or_else(|| {
        ForecastError::DataProcessing(format!("field `{name}` has no entry for day {index}"))
    })
}

fn parse_date(value: &str, index: usize) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ForecastError::DataProcessing(format!("invalid date `{value}` for day {index}: {e}"))
    })
}

/// Extract the time-of-day from an ISO 8601 timestamp such as
/// `2024-01-01T07:15`. Upstream omits seconds, but they are accepted.
fn parse_time_of_day(value: &str, name: &str, index: usize) -> Result<NaiveTime, ForecastError> {
    let time_part = value.split_once('T').map_or(value, |(_, t)| t);

    NaiveTime::parse_from_str(time_part, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time_part, "%H:%M:%S"))
        .map_err(|e| {
            ForecastError::DataProcessing(format!(
                "invalid {name} time `{value}` for day {index}: {e}"
            ))
        })
}

fn average_pressure(readings: &Option<Vec<f64>>) -> Result<f64, ForecastError> {
    let readings = readings.as_ref().ok_or_else(|| {
        ForecastError::DataProcessing("hourly series is missing `pressure_msl`".into())
    })?;
    if readings.is_empty() {
        return Err(ForecastError::DataProcessing("hourly pressure series is empty".into()));
    }

    Ok(readings.iter().sum::<f64>() / readings.len() as f64)
}

/// Reduce fully-parsed records to the weekly aggregates. Each reduction runs
/// over its own field; by this point every day has already been parsed, so
/// no aggregate can skip a day.
fn reduce(records: Vec<DailyRecord>, average_pressure: f64) -> Result<ForecastResult, ForecastError> {
    if records.is_empty() {
        return Err(ForecastError::DataProcessing("daily series contains no days".into()));
    }

    let average_sun_exposure =
        records.iter().map(|r| r.solar_energy).sum::<f64>() / records.len() as f64;
    let min_temperature =
        records.iter().map(|r| r.min_temperature).fold(f64::INFINITY, f64::min);
    let max_temperature =
        records.iter().map(|r| r.max_temperature).fold(f64::NEG_INFINITY, f64::max);

    let rainy_days =
        records.iter().filter(|r| PRECIPITATION_CODES.contains(&r.weather_code)).count();
    let weather_summary = if rainy_days > RAINY_DAYS_THRESHOLD {
        SUMMARY_MOSTLY_WET.to_string()
    } else {
        SUMMARY_MOSTLY_DRY.to_string()
    };

    Ok(ForecastResult {
        daily_records: records,
        average_pressure,
        average_sun_exposure,
        min_temperature,
        max_temperature,
        weather_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SolarInstallation,
        gateway::{HourlySeries, RawPressurePayload, RawWeatherPayload},
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct MockGateway {
        weather: RawWeatherPayload,
        pressure: RawPressurePayload,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherGateway for MockGateway {
        async fn fetch_daily_forecast(
            &self,
            _location: Coordinate,
        ) -> Result<RawWeatherPayload, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.weather.clone())
        }

        async fn fetch_hourly_pressure(
            &self,
            _location: Coordinate,
        ) -> Result<RawPressurePayload, ForecastError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pressure.clone())
        }
    }

    /// Canned series with 06:00 sunrise and 18:00 sunset every day.
    fn sample_series(days: usize) -> DailySeries {
        DailySeries {
            time: Some((0..days).map(|i| format!("2024-01-{:02}", i + 1)).collect()),
            weathercode: Some(vec![1; days]),
            temperature_2m_max: Some(vec![20.5; days]),
            temperature_2m_min: Some(vec![10.5; days]),
            sunrise: Some((0..days).map(|i| format!("2024-01-{:02}T06:00", i + 1)).collect()),
            sunset: Some((0..days).map(|i| format!("2024-01-{:02}T18:00", i + 1)).collect()),
            daylight_duration: Some(vec![43200.0; days]),
        }
    }

    fn service_over(daily: Option<DailySeries>, pressure: Option<Vec<f64>>) -> ForecastService {
        let gateway = MockGateway {
            weather: RawWeatherPayload { daily },
            pressure: RawPressurePayload {
                hourly: Some(HourlySeries { pressure_msl: pressure }),
            },
            calls: AtomicUsize::new(0),
        };
        ForecastService::new(
            Arc::new(gateway),
            SolarEnergyEstimator::new(SolarInstallation::default()),
        )
    }

    #[tokio::test]
    async fn single_day_forecast_is_fully_derived() {
        let service = service_over(Some(sample_series(1)), Some(vec![1013.0, 1014.0]));

        let forecast = service.get_forecast(52.0, 21.0).await.expect("forecast must succeed");

        assert_eq!(forecast.daily_records.len(), 1);
        let day = &forecast.daily_records[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(day.weather_code, 1);
        assert_eq!(day.max_temperature, 20.5);
        assert_eq!(day.min_temperature, 10.5);
        assert!((day.daylight_hours - 12.0).abs() < 1e-9);
        // 12 h of sun at 2.5 kW, 20% efficiency, 85% after losses.
        assert!((day.solar_energy - 5.1).abs() < 1e-9);
        assert!((forecast.average_pressure - 1013.5).abs() < 1e-9);
        assert!((forecast.average_sun_exposure - 5.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn temperature_extremes_reduce_over_their_own_fields() {
        let mut series = sample_series(2);
        series.temperature_2m_max = Some(vec![20.5, 21.5]);
        series.temperature_2m_min = Some(vec![10.5, 11.5]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let forecast = service.get_forecast(0.0, 0.0).await.expect("forecast must succeed");

        assert_eq!(forecast.daily_records.len(), 2);
        assert_eq!(forecast.min_temperature, 10.5);
        assert_eq!(forecast.max_temperature, 21.5);
    }

    #[tokio::test]
    async fn four_rainy_days_yield_wet_summary() {
        let mut series = sample_series(7);
        series.weathercode = Some(vec![61, 53, 50, 69, 1, 2, 3]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let forecast = service.get_forecast(0.0, 0.0).await.unwrap();
        assert_eq!(forecast.weather_summary, SUMMARY_MOSTLY_WET);
    }

    #[tokio::test]
    async fn three_rainy_days_stay_dry() {
        let mut series = sample_series(7);
        series.weathercode = Some(vec![61, 53, 50, 1, 2, 3, 49]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let forecast = service.get_forecast(0.0, 0.0).await.unwrap();
        assert_eq!(forecast.weather_summary, SUMMARY_MOSTLY_DRY);
    }

    #[tokio::test]
    async fn series_longer_than_window_is_truncated() {
        let service = service_over(Some(sample_series(10)), Some(vec![1000.0]));

        let forecast = service.get_forecast(0.0, 0.0).await.unwrap();
        assert_eq!(forecast.daily_records.len(), FORECAST_DAYS);
    }

    #[tokio::test]
    async fn missing_daily_container_is_external_service_failure() {
        let service = service_over(None, Some(vec![1000.0]));

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::MalformedPayload(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_hourly_container_is_external_service_failure() {
        let gateway = MockGateway {
            weather: RawWeatherPayload { daily: Some(sample_series(7)) },
            pressure: RawPressurePayload { hourly: None },
            calls: AtomicUsize::new(0),
        };
        let service = ForecastService::new(
            Arc::new(gateway),
            SolarEnergyEstimator::new(SolarInstallation::default()),
        );

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::MalformedPayload(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_sunrise_field_is_processing_failure() {
        let mut series = sample_series(7);
        series.sunrise = None;
        let service = service_over(Some(series), Some(vec![1000.0]));

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        let ForecastError::DataProcessing(msg) = err else {
            panic!("expected DataProcessing, got {err:?}");
        };
        assert!(msg.contains("sunrise"));
    }

    #[tokio::test]
    async fn ragged_parallel_arrays_abort_the_forecast() {
        let mut series = sample_series(2);
        series.weathercode = Some(vec![1]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::DataProcessing(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unparseable_date_aborts_the_forecast() {
        let mut series = sample_series(1);
        series.time = Some(vec!["not-a-date".to_string()]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::DataProcessing(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_pressure_series_is_processing_failure() {
        let service = service_over(Some(sample_series(7)), Some(vec![]));

        let err = service.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::DataProcessing(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_coordinate_short_circuits_before_any_fetch() {
        let gateway = Arc::new(MockGateway::default());
        let service = ForecastService::new(
            gateway.clone(),
            SolarEnergyEstimator::new(SolarInstallation::default()),
        );

        let err = service.get_forecast(90.0001, 0.0).await.unwrap_err();
        assert!(matches!(err, ForecastError::InvalidLocation { .. }), "got {err:?}");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn weekly_summary_matches_forecast_aggregates() {
        let service = service_over(Some(sample_series(7)), Some(vec![990.0, 1010.0]));

        let forecast = service.get_forecast(45.0, 90.0).await.unwrap();
        let summary = service.get_weekly_summary(45.0, 90.0).await.unwrap();

        assert_eq!(summary.average_pressure, forecast.average_pressure);
        assert_eq!(summary.average_sun_exposure, forecast.average_sun_exposure);
        assert_eq!(summary.min_temperature, forecast.min_temperature);
        assert_eq!(summary.max_temperature, forecast.max_temperature);
        assert_eq!(summary.weather_summary, forecast.weather_summary);
    }

    #[tokio::test]
    async fn fractional_sun_exposure_feeds_the_estimate() {
        let mut series = sample_series(1);
        series.sunrise = Some(vec!["2024-01-01T07:15".to_string()]);
        series.sunset = Some(vec!["2024-01-01T16:30".to_string()]);
        let service = service_over(Some(series), Some(vec![1000.0]));

        let forecast = service.get_forecast(0.0, 0.0).await.unwrap();
        // 9.25 h between 07:15 and 16:30.
        let expected = 2.5 * 9.25 * 0.20 * 0.85;
        assert!((forecast.daily_records[0].solar_energy - expected).abs() < 1e-9);
    }
}
