use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use solar_core::{ForecastResponse, ForecastService, WeeklySummaryResponse};

use crate::error::ApiError;

type SharedService = Arc<ForecastService>;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/forecast", get(get_forecast))
        .route("/summary", get(get_weekly_summary))
        .route("/health", get(health))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// `GET /forecast?latitude=&longitude=` — full 7-day forecast.
async fn get_forecast(
    State(service): State<SharedService>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let forecast = service.get_forecast(query.latitude, query.longitude).await?;
    Ok(Json(ForecastResponse::from(forecast)))
}

/// `GET /summary?latitude=&longitude=` — weekly aggregates only.
async fn get_weekly_summary(
    State(service): State<SharedService>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<WeeklySummaryResponse>, ApiError> {
    let summary = service.get_weekly_summary(query.latitude, query.longitude).await?;
    Ok(Json(WeeklySummaryResponse::from(summary)))
}

async fn health() -> &'static str {
    "ok"
}
