//! Horse and blanket configuration endpoints.
//!
//! - GET    /api/v1/horses
//! - POST   /api/v1/horses
//! - DELETE /api/v1/horses/:id
//! - POST   /api/v1/horses/:id/blankets

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppState;
use crate::db::models::{self, HorseWithBlankets};
use crate::db::queries::{self, InsertBlanketParams};
use crate::errors::{AppError, ErrorResponse};
use crate::helpers::require_non_blank;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHorseRequest {
    /// Horse name (must not be blank)
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlanketRequest {
    /// Blanket name (must not be blank)
    pub name: String,
    /// Lowest apparent temperature (°F, inclusive) this blanket suits
    pub min_temp: i32,
    /// Highest apparent temperature (°F, inclusive) this blanket suits
    pub max_temp: i32,
}

/// A blanket as returned by the API.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct BlanketResponse {
    pub id: i64,
    pub horse_id: i64,
    pub name: String,
    pub min_temp: i32,
    pub max_temp: i32,
}

impl From<models::Blanket> for BlanketResponse {
    fn from(b: models::Blanket) -> Self {
        Self {
            id: b.id,
            horse_id: b.horse_id,
            name: b.name,
            min_temp: b.min_temp,
            max_temp: b.max_temp,
        }
    }
}

/// A horse with its blankets, in the order they are considered.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct HorseResponse {
    pub id: i64,
    pub name: String,
    pub blankets: Vec<BlanketResponse>,
}

impl From<HorseWithBlankets> for HorseResponse {
    fn from(h: HorseWithBlankets) -> Self {
        Self {
            id: h.horse.id,
            name: h.horse.name,
            blankets: h.blankets.into_iter().map(BlanketResponse::from).collect(),
        }
    }
}

/// Validate a blanket before it is stored. The recommendation rules assume
/// every stored range is well formed.
fn validate_blanket(req: &CreateBlanketRequest) -> Result<String, AppError> {
    let name = require_non_blank("Blanket name", &req.name)?;
    if req.min_temp > req.max_temp {
        return Err(AppError::BadRequest(format!(
            "min_temp ({}) must not exceed max_temp ({})",
            req.min_temp, req.max_temp
        )));
    }
    Ok(name)
}

/// List every horse with its blankets.
#[utoipa::path(
    get,
    path = "/api/v1/horses",
    tag = "Horses",
    responses(
        (status = 200, description = "All horses with their blankets", body = Vec<HorseResponse>),
    )
)]
pub async fn list_horses(State(state): State<AppState>) -> Result<Json<Vec<HorseResponse>>, AppError> {
    let mut conn = state.pool.acquire().await?;
    let horses = queries::list_horses_with_blankets(&mut conn).await?;
    Ok(Json(horses.into_iter().map(HorseResponse::from).collect()))
}

/// Add a horse.
#[utoipa::path(
    post,
    path = "/api/v1/horses",
    tag = "Horses",
    request_body = CreateHorseRequest,
    responses(
        (status = 201, description = "Horse created", body = HorseResponse),
        (status = 400, description = "Blank name", body = ErrorResponse),
    )
)]
pub async fn create_horse(
    State(state): State<AppState>,
    Json(req): Json<CreateHorseRequest>,
) -> Result<(StatusCode, Json<HorseResponse>), AppError> {
    let name = require_non_blank("Horse name", &req.name)?;

    let mut conn = state.pool.acquire().await?;
    let horse = queries::insert_horse(&mut conn, &name).await?;
    tracing::info!("Added horse '{}' (id={})", horse.name, horse.id);

    Ok((
        StatusCode::CREATED,
        Json(HorseResponse::from(HorseWithBlankets {
            horse,
            blankets: Vec::new(),
        })),
    ))
}

/// Delete a horse together with its blankets.
#[utoipa::path(
    delete,
    path = "/api/v1/horses/{id}",
    tag = "Horses",
    params(
        ("id" = i64, Path, description = "Horse id"),
    ),
    responses(
        (status = 204, description = "Horse and blankets deleted"),
        (status = 404, description = "Horse not found", body = ErrorResponse),
    )
)]
pub async fn delete_horse(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.pool.begin().await?;
    if !queries::delete_horse(&mut tx, id).await? {
        return Err(AppError::NotFound(format!("Horse {} not found", id)));
    }
    tx.commit().await?;

    tracing::info!("Deleted horse id={}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Add a blanket to a horse. Blankets are considered in the order added.
#[utoipa::path(
    post,
    path = "/api/v1/horses/{id}/blankets",
    tag = "Horses",
    params(
        ("id" = i64, Path, description = "Horse id"),
    ),
    request_body = CreateBlanketRequest,
    responses(
        (status = 201, description = "Blanket created", body = BlanketResponse),
        (status = 400, description = "Blank name or min_temp above max_temp", body = ErrorResponse),
        (status = 404, description = "Horse not found", body = ErrorResponse),
    )
)]
pub async fn create_blanket(
    State(state): State<AppState>,
    Path(horse_id): Path<i64>,
    Json(req): Json<CreateBlanketRequest>,
) -> Result<(StatusCode, Json<BlanketResponse>), AppError> {
    let name = validate_blanket(&req)?;

    // Existence check and insert share one transaction.
    let mut tx = state.pool.begin().await?;
    queries::get_horse(&mut tx, horse_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Horse {} not found", horse_id)))?;

    let blanket = queries::insert_blanket(
        &mut tx,
        InsertBlanketParams {
            horse_id,
            name: &name,
            min_temp: req.min_temp,
            max_temp: req.max_temp,
        },
    )
    .await?;
    tx.commit().await?;
    tracing::info!(
        "Added blanket '{}' ({}..={}) to horse id={}",
        blanket.name,
        blanket.min_temp,
        blanket.max_temp,
        horse_id
    );

    Ok((StatusCode::CREATED, Json(BlanketResponse::from(blanket))))
}
