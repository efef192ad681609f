pub mod address;
pub mod health;
pub mod home;
pub mod horses;

use crate::services::geocode::GeocodeClient;
use crate::services::open_meteo::OpenMeteoClient;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) pool: sqlx::SqlitePool,
    pub(crate) geocoder: GeocodeClient,
    pub(crate) forecaster: OpenMeteoClient,
}
