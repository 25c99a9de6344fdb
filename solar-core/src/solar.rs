use crate::{config::SolarInstallation, error::ForecastError};

const DAYS_PER_YEAR: f64 = 365.0;
/// At full cloud cover the usable efficiency drops by 70%. A deliberately
/// simple linear heuristic, not a radiative-transfer model.
const MAX_CLOUD_ATTENUATION: f64 = 0.7;

/// Estimates photovoltaic output for a fixed installation.
///
/// Stateless apart from the injected installation parameters; safe to share
/// and call concurrently.
#[derive(Debug, Clone, Copy)]
pub struct SolarEnergyEstimator {
    installation: SolarInstallation,
}

impl SolarEnergyEstimator {
    pub fn new(installation: SolarInstallation) -> Self {
        Self { installation }
    }

    /// Estimated production in kWh for one day with the given hours of sun
    /// exposure.
    pub fn estimate_daily(&self, sun_exposure_hours: f64) -> Result<f64, ForecastError> {
        validate_sun_hours(sun_exposure_hours)?;

        Ok(self.installation.power_kw
            * sun_exposure_hours
            * self.installation.panel_efficiency
            * self.installation.system_losses)
    }

    /// Estimated production in kWh for a month, given the average daily sun
    /// exposure and the number of days in that month.
    pub fn estimate_monthly(
        &self,
        avg_daily_hours: f64,
        days_in_month: u32,
    ) -> Result<f64, ForecastError> {
        if !(1..=31).contains(&days_in_month) {
            return Err(ForecastError::InvalidParameter(format!(
                "days in month must be between 1 and 31, got {days_in_month}"
            )));
        }

        Ok(self.estimate_daily(avg_daily_hours)? * f64::from(days_in_month))
    }

    /// Estimated production in kWh for a year, given the average daily sun
    /// exposure over that year.
    pub fn estimate_yearly(&self, avg_daily_hours: f64) -> Result<f64, ForecastError> {
        Ok(self.estimate_daily(avg_daily_hours)? * DAYS_PER_YEAR)
    }

    /// Effective system efficiency for a day, attenuated linearly by cloud
    /// cover.
    pub fn estimate_system_efficiency(
        &self,
        sun_exposure_hours: f64,
        cloud_cover_percent: f64,
    ) -> Result<f64, ForecastError> {
        validate_sun_hours(sun_exposure_hours)?;
        if !(0.0..=100.0).contains(&cloud_cover_percent) {
            return Err(ForecastError::InvalidParameter(format!(
                "cloud cover percentage must be between 0 and 100, got {cloud_cover_percent}"
            )));
        }

        let cloud_reduction = 1.0 - cloud_cover_percent / 100.0 * MAX_CLOUD_ATTENUATION;
        Ok(self.installation.panel_efficiency * self.installation.system_losses * cloud_reduction)
    }
}

fn validate_sun_hours(sun_exposure_hours: f64) -> Result<(), ForecastError> {
    if !(0.0..=24.0).contains(&sun_exposure_hours) {
        return Err(ForecastError::InvalidParameter(format!(
            "sun exposure hours must be between 0 and 24, got {sun_exposure_hours}"
        )));
    }
    Ok(())
}
