//! Home page endpoint: today's weather and per-horse recommendations.
//!
//! - GET /api/v1/home

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::db::queries;
use crate::errors::AppError;
use crate::services::recommend::{recommend, Recommendation};
use crate::services::weather::{aggregate, WeatherSummary};

/// Home page payload.
///
/// `address == null` means no address is configured. `weather == null` with
/// an address means the forecast was unavailable; `recommendations` is then
/// empty rather than a list of fallbacks.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    /// Configured address, or null when none has been set
    pub address: Option<String>,
    /// Today's weather summary, or null when unavailable
    pub weather: Option<WeatherSummary>,
    /// When the weather was fetched (RFC 3339); null without weather
    pub fetched_at: Option<String>,
    /// One entry per horse, in horse order
    pub recommendations: Vec<Recommendation>,
}

/// Today's weather at the configured address with a recommendation per horse.
///
/// Never fails because of the weather services: an unresolvable address or
/// an upstream outage yields `weather: null` and no recommendations.
#[utoipa::path(
    get,
    path = "/api/v1/home",
    tag = "Home",
    responses(
        (status = 200, description = "Weather and blanket recommendations", body = HomeResponse),
    )
)]
pub async fn get_home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    // Release the connection before the outbound calls.
    let (address, horses) = {
        let mut conn = state.pool.acquire().await?;
        let address = queries::get_address(&mut conn).await?;
        let horses = queries::list_horses_with_blankets(&mut conn).await?;
        (address, horses)
    };

    let Some(address) = address else {
        return Ok(Json(HomeResponse {
            address: None,
            weather: None,
            fetched_at: None,
            recommendations: Vec::new(),
        }));
    };

    let outlook = aggregate(&state.geocoder, &state.forecaster, &address).await;
    let response = match outlook.summary() {
        Some(summary) => HomeResponse {
            address: Some(address),
            weather: Some(summary),
            fetched_at: Some(Utc::now().to_rfc3339()),
            recommendations: recommend(&summary, &horses),
        },
        None => HomeResponse {
            address: Some(address),
            weather: None,
            fetched_at: None,
            recommendations: Vec::new(),
        },
    };

    Ok(Json(response))
}
