//! Forecast aggregation.
//!
//! Resolves the configured address, fetches today's hourly forecast and
//! reduces it to a [`WeatherSummary`]. Every upstream failure is logged and
//! collapsed into [`Outlook::Unavailable`]; nothing here returns an error to
//! the caller.

use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::services::geocode::GeocodeClient;
use crate::services::open_meteo::{HourlyForecast, OpenMeteoClient};

/// Hours in a regular local day. DST transitions yield 23 or 25.
const EXPECTED_HOURLY_SAMPLES: usize = 24;

/// One day of weather reduced to the values the recommendation rules use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct WeatherSummary {
    /// Mean hourly air temperature (°F)
    pub avg_temp: f64,
    /// Lowest hourly apparent ("wind chill") temperature (°F)
    pub min_chill: f64,
    /// Total precipitation over the day (inches)
    pub total_precip: f64,
    /// Most severe hourly WMO weather code
    pub max_code: i32,
}

/// Result of aggregating the forecast for an address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outlook {
    Available(WeatherSummary),
    /// The address could not be resolved or an upstream call failed.
    Unavailable,
}

impl Outlook {
    pub fn summary(&self) -> Option<WeatherSummary> {
        match self {
            Outlook::Available(summary) => Some(*summary),
            Outlook::Unavailable => None,
        }
    }
}

/// Reduce the hourly series into a [`WeatherSummary`].
///
/// Pure: the result depends only on the arrays. Empty or unequal-length
/// series are rejected as malformed.
pub fn summarize(hourly: &HourlyForecast) -> Result<WeatherSummary, AppError> {
    let n = hourly.temperature_2m.len();
    if n == 0 {
        return Err(AppError::ExternalServiceError(
            "Forecast returned an empty hourly series".to_string(),
        ));
    }
    if hourly.apparent_temperature.len() != n
        || hourly.precipitation.len() != n
        || hourly.weathercode.len() != n
    {
        return Err(AppError::ExternalServiceError(format!(
            "Forecast hourly series have mismatched lengths: temperature={}, apparent={}, precipitation={}, weathercode={}",
            n,
            hourly.apparent_temperature.len(),
            hourly.precipitation.len(),
            hourly.weathercode.len()
        )));
    }
    if n != EXPECTED_HOURLY_SAMPLES {
        tracing::debug!("Forecast has {} hourly samples, expected {}", n, EXPECTED_HOURLY_SAMPLES);
    }

    let avg_temp = hourly.temperature_2m.iter().sum::<f64>() / n as f64;
    let min_chill = hourly
        .apparent_temperature
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let total_precip = hourly.precipitation.iter().sum::<f64>();
    let max_code = hourly.weathercode.iter().copied().max().unwrap_or_default();

    Ok(WeatherSummary {
        avg_temp,
        min_chill,
        total_precip,
        max_code,
    })
}

/// Geocode `address`, fetch its hourly forecast and summarize it.
///
/// Makes at most two sequential outbound calls.
pub async fn aggregate(
    geocoder: &GeocodeClient,
    forecaster: &OpenMeteoClient,
    address: &str,
) -> Outlook {
    match try_aggregate(geocoder, forecaster, address).await {
        Ok(Some(summary)) => Outlook::Available(summary),
        Ok(None) => {
            tracing::info!("Address '{}' could not be resolved; weather unavailable", address);
            Outlook::Unavailable
        }
        Err(e) => {
            tracing::warn!("Weather unavailable for '{}': {}", address, e);
            Outlook::Unavailable
        }
    }
}

async fn try_aggregate(
    geocoder: &GeocodeClient,
    forecaster: &OpenMeteoClient,
    address: &str,
) -> Result<Option<WeatherSummary>, AppError> {
    let Some(coords) = geocoder.geocode(address).await? else {
        return Ok(None);
    };
    let hourly = forecaster.fetch_hourly(coords).await?;
    summarize(&hourly).map(Some)
}
