use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    error::ForecastError,
    gateway::{RawPressurePayload, RawWeatherPayload, WeatherGateway},
    model::Coordinate,
};

const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,sunrise,sunset,daylight_duration";
const HOURLY_FIELDS: &str = "pressure_msl";
const FORECAST_DAYS: &str = "7";

/// Gateway to the Open-Meteo forecast API.
///
/// Both operations hit the same `/forecast` endpoint with different field
/// selections. Requests are bounded by the configured timeout; a timeout is
/// a failure, never a retry trigger.
#[derive(Debug, Clone)]
pub struct OpenMeteoGateway {
    http: Client,
    base_url: String,
}

impl OpenMeteoGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ForecastError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::UpstreamUnreachable(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        location: Coordinate,
        series_param: &str,
        series_fields: &str,
    ) -> Result<T, ForecastError> {
        let url = format!("{}/forecast", self.base_url);
        debug!(url = %url, series = series_param, "fetching upstream forecast data");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", location.latitude().to_string().as_str()),
                ("longitude", location.longitude().to_string().as_str()),
                (series_param, series_fields),
                ("timezone", "auto"),
                ("forecast_days", FORECAST_DAYS),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::UpstreamStatus { status: status.as_u16() });
        }

        res.json::<T>()
            .await
            .map_err(|e| ForecastError::MalformedPayload(format!("undecodable response body: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> ForecastError {
    if e.is_timeout() {
        ForecastError::UpstreamUnreachable("request to upstream timed out".to_string())
    } else {
        ForecastError::UpstreamUnreachable(e.to_string())
    }
}

#[async_trait]
impl WeatherGateway for OpenMeteoGateway {
    #[instrument(skip(self), fields(lat = %location.latitude(), lon = %location.longitude()))]
    async fn fetch_daily_forecast(
        &self,
        location: Coordinate,
    ) -> Result<RawWeatherPayload, ForecastError> {
        self.fetch(location, "daily", DAILY_FIELDS).await
    }

    #[instrument(skip(self), fields(lat = %location.latitude(), lon = %location.longitude()))]
    async fn fetch_hourly_pressure(
        &self,
        location: Coordinate,
    ) -> Result<RawPressurePayload, ForecastError> {
        self.fetch(location, "hourly", HOURLY_FIELDS).await
    }
}
