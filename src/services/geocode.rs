//! Forward geocoding via a Nominatim-compatible search endpoint.
//!
//! See: https://nominatim.org/release-docs/latest/api/Search/

use serde::Deserialize;

use crate::errors::AppError;
use crate::helpers::{build_http_client, join_url};

/// A resolved geographic position (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Client for the Nominatim search API.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl GeocodeClient {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, AppError> {
        Ok(Self {
            client: build_http_client(user_agent, timeout_secs)?,
            base_url: base_url.to_string(),
        })
    }

    /// Resolve a free-text address to coordinates.
    ///
    /// Returns `Ok(None)` when the address is blank or the service finds no
    /// match; transport, HTTP status and parse failures are errors.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, AppError> {
        let query = address.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let url = join_url(&self.base_url, "search");
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Geocoding service returned HTTP {}",
                response.status()
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Geocoding JSON parse error: {}", e))
        })?;

        let Some(place) = places.into_iter().next() else {
            tracing::info!("No geocoding match for '{}'", query);
            return Ok(None);
        };

        let coords = parse_place(&place)?;
        tracing::debug!(
            "Geocoded '{}' to {:.4},{:.4} ({})",
            query,
            coords.latitude,
            coords.longitude,
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(Some(coords))
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinates, AppError> {
    let parse = |field: &str, raw: &str| {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
            AppError::ExternalServiceError(format!("Geocoding returned invalid {}: '{}'", field, raw))
        })
    };
    Ok(Coordinates {
        latitude: parse("latitude", &place.lat)?,
        longitude: parse("longitude", &place.lon)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeocodeClient {
        GeocodeClient::new(&server.uri(), "test-agent", 5).unwrap()
    }

    #[tokio::test]
    async fn test_geocode_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "1 Barn Lane, Lexington"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "38.0406", "lon": "-84.5037", "display_name": "Lexington, KY" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let coords = client(&server)
            .geocode("  1 Barn Lane, Lexington ")
            .await
            .unwrap()
            .unwrap();
        assert!((coords.latitude - 38.0406).abs() < 1e-9);
        assert!((coords.longitude + 84.5037).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_geocode_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        assert_eq!(client(&server).geocode("nowhere at all").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_blank_address_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(client(&server).geocode("   ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).geocode("Lexington").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_geocode_invalid_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "lat": "north-ish", "lon": "-84.5" }
            ])))
            .mount(&server)
            .await;

        let err = client(&server).geocode("Lexington").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
