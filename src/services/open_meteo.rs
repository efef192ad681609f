//! Open-Meteo hourly forecast client.
//!
//! Fetches one local day of hourly data in imperial units.
//! See: https://open-meteo.com/en/docs

use serde::Deserialize;

use crate::errors::AppError;
use crate::helpers::{build_http_client, join_url};
use crate::services::geocode::Coordinates;

/// Hourly variables requested from Open-Meteo, in response order.
const HOURLY_VARIABLES: &str = "temperature_2m,apparent_temperature,precipitation,weathercode";

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

/// Parallel hourly series for a single local day.
///
/// Temperatures are °F, precipitation is inches. Null entries fail
/// deserialization, so every value here is present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub weathercode: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    timezone: Option<String>,
    hourly: HourlyForecast,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, AppError> {
        Ok(Self {
            client: build_http_client(user_agent, timeout_secs)?,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch today's hourly forecast at `coords`, resolved in the location's
    /// own timezone.
    pub async fn fetch_hourly(&self, coords: Coordinates) -> Result<HourlyForecast, AppError> {
        let url = join_url(&self.base_url, "v1/forecast");
        let latitude = format!("{:.4}", coords.latitude);
        let longitude = format!("{:.4}", coords.longitude);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("hourly", HOURLY_VARIABLES),
                ("temperature_unit", "fahrenheit"),
                ("windspeed_unit", "mph"),
                ("precipitation_unit", "inch"),
                ("timezone", "auto"),
                ("forecast_days", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Forecast request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Forecast service returned HTTP {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Forecast JSON parse error: {}", e))
        })?;

        tracing::debug!(
            "Fetched {} hourly samples for {},{} starting {} (timezone {})",
            body.hourly.temperature_2m.len(),
            latitude,
            longitude,
            body.hourly.time.first().map(String::as_str).unwrap_or("unknown"),
            body.timezone.as_deref().unwrap_or("unknown")
        );

        Ok(body.hourly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COORDS: Coordinates = Coordinates {
        latitude: 38.04061,
        longitude: -84.50372,
    };

    fn client(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(&server.uri(), "test-agent", 5).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_hourly_request_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "38.0406"))
            .and(query_param("longitude", "-84.5037"))
            .and(query_param("hourly", HOURLY_VARIABLES))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("windspeed_unit", "mph"))
            .and(query_param("precipitation_unit", "inch"))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 38.04,
                "longitude": -84.5,
                "timezone": "America/New_York",
                "hourly": {
                    "time": ["2026-10-16T00:00", "2026-10-16T01:00"],
                    "temperature_2m": [50.1, 48.9],
                    "apparent_temperature": [45.0, 43.2],
                    "precipitation": [0.0, 0.01],
                    "weathercode": [0, 3]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hourly = client(&server).fetch_hourly(COORDS).await.unwrap();
        assert_eq!(hourly.time.len(), 2);
        assert_eq!(hourly.temperature_2m, vec![50.1, 48.9]);
        assert_eq!(hourly.apparent_temperature, vec![45.0, 43.2]);
        assert_eq!(hourly.precipitation, vec![0.0, 0.01]);
        assert_eq!(hourly.weathercode, vec![0, 3]);
    }

    #[tokio::test]
    async fn test_fetch_hourly_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "temperature_2m": [50.0],
                    "apparent_temperature": [45.0],
                    "precipitation": [0.0]
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch_hourly(COORDS).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_fetch_hourly_null_sample() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "temperature_2m": [50.0, null],
                    "apparent_temperature": [45.0, 44.0],
                    "precipitation": [0.0, 0.0],
                    "weathercode": [0, 0]
                }
            })))
            .mount(&server)
            .await;

        assert!(client(&server).fetch_hourly(COORDS).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_hourly_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": true,
                "reason": "Latitude must be in range of -90 to 90°."
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch_hourly(COORDS).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(msg) if msg.contains("400")));
    }
}
