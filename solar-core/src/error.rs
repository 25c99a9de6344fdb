use thiserror::Error;

/// Failure taxonomy for the forecast pipeline.
///
/// The split between `MalformedPayload` and `DataProcessing` is deliberate:
/// the former means the upstream response envelope itself was unusable
/// (missing top-level series, undecodable body), the latter means the
/// envelope was fine but a required field was absent or a value could not
/// be parsed. The two surface as different HTTP classes.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Coordinate outside the valid range; raised before any network call.
    #[error(
        "invalid location ({latitude}, {longitude}): latitude must be within [-90, 90] and longitude within [-180, 180]"
    )]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// Upstream answered with a non-success HTTP status.
    #[error("upstream weather service returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    /// Upstream could not be reached, or the request timed out.
    #[error("upstream weather service unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upstream responded, but the payload envelope was unusable.
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),

    /// The payload envelope was well-formed but violated the data contract.
    #[error("failed to process weather data: {0}")]
    DataProcessing(String),

    /// An estimator precondition was violated. Validated pipeline input
    /// should make this unreachable; seeing it indicates a pipeline bug.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ForecastError {
    /// Machine-readable code for the outward error shape.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLocation { .. } => "INVALID_LOCATION",
            Self::UpstreamStatus { .. } | Self::UpstreamUnreachable(_) | Self::MalformedPayload(_) => {
                "EXTERNAL_SERVICE_ERROR"
            }
            Self::DataProcessing(_) => "WEATHER_DATA_ERROR",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
        }
    }
}
