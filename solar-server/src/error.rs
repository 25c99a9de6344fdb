//! Translation of pipeline failures into HTTP responses.
//!
//! Callers always receive one structured body with a machine-readable code,
//! a human-readable message, and a timestamp; stack traces never leak.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use solar_core::ForecastError;

#[derive(Debug)]
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Upstream's own 5xx means we are a bad gateway; any other upstream or
/// transport problem means the service is unavailable. Contract violations
/// in an otherwise successful response are unprocessable entities.
fn status_for(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::InvalidLocation { .. } => StatusCode::BAD_REQUEST,
        ForecastError::UpstreamStatus { status } if *status >= 500 => StatusCode::BAD_GATEWAY,
        ForecastError::UpstreamStatus { .. } | ForecastError::UpstreamUnreachable(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ForecastError::MalformedPayload(_) => StatusCode::BAD_GATEWAY,
        ForecastError::DataProcessing(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::InvalidParameter(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ErrorBody {
            error_code: self.0.code().to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}
