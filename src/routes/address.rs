//! Home address endpoints.
//!
//! - GET /api/v1/address
//! - PUT /api/v1/address

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;
use crate::db::queries;
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::require_non_blank;

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    /// Configured address, or null when none has been set
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAddressRequest {
    /// Free-text address used for geocoding (must not be blank)
    pub address: String,
}

/// Get the configured home address.
#[utoipa::path(
    get,
    path = "/api/v1/address",
    tag = "Address",
    responses(
        (status = 200, description = "The configured address (null if unset)", body = AddressResponse),
    )
)]
pub async fn get_address(State(state): State<AppState>) -> Result<Json<AddressResponse>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let address = queries::get_address(&mut conn).await?;
    Ok(Json(AddressResponse { address }))
}

/// Replace the configured home address.
#[utoipa::path(
    put,
    path = "/api/v1/address",
    tag = "Address",
    request_body = SetAddressRequest,
    responses(
        (status = 200, description = "Address stored", body = AddressResponse),
        (status = 400, description = "Blank address", body = ErrorResponse),
    )
)]
pub async fn set_address(
    State(state): State<AppState>,
    Json(req): Json<SetAddressRequest>,
) -> Result<Json<AddressResponse>, AppError> {
    let address = require_non_blank("Address", &req.address)?;

    let mut tx = state.pool.begin().await?;
    queries::set_address(&mut tx, &address).await?;
    tx.commit().await?;
    tracing::info!("Home address updated");

    Ok(Json(AddressResponse {
        address: Some(address),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support;

    fn req(address: &str) -> Json<SetAddressRequest> {
        Json(SetAddressRequest {
            address: address.to_string(),
        })
    }

    #[tokio::test]
    async fn test_address_unset() {
        let state = test_support::state("http://127.0.0.1:9").await;
        let Json(body) = get_address(State(state)).await.unwrap();
        assert_eq!(body.address, None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let state = test_support::state("http://127.0.0.1:9").await;
        let _ = set_address(State(state.clone()), req("1 Barn Lane")).await.unwrap();
        let Json(stored) = set_address(State(state.clone()), req(" 2 Paddock Road ")).await.unwrap();
        assert_eq!(stored.address.as_deref(), Some("2 Paddock Road"));

        let Json(body) = get_address(State(state)).await.unwrap();
        assert_eq!(body.address.as_deref(), Some("2 Paddock Road"));
    }

    #[tokio::test]
    async fn test_blank_address_rejected() {
        let state = test_support::state("http://127.0.0.1:9").await;
        let _ = set_address(State(state.clone()), req("1 Barn Lane")).await.unwrap();

        let err = set_address(State(state.clone()), req("  ")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let Json(body) = get_address(State(state)).await.unwrap();
        assert_eq!(body.address.as_deref(), Some("1 Barn Lane"));
    }
}
