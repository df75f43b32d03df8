use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use holocron_db::models::EntryRow;
use holocron_types::api::{CreateEntryRequest, EntryResponse, UpdateEntryRequest};

use crate::AppStateInner;
use crate::error::ApiError;

fn to_response(row: EntryRow) -> EntryResponse {
    EntryResponse {
        id: row.id,
        name: row.name,
        description: row.description,
    }
}

pub async fn list_planets(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, ApiError> {
    let planets: Vec<EntryResponse> = state
        .db
        .list_planets()?
        .into_iter()
        .map(to_response)
        .collect();

    Ok(Json(planets))
}

pub async fn get_planet(
    State(state): State<Arc<AppStateInner>>,
    Path(planet_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_planet(planet_id)?
        .ok_or_else(|| ApiError::NotFound("planet not found".into()))?;

    Ok(Json(to_response(row)))
}

pub async fn create_planet(
    State(state): State<Arc<AppStateInner>>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(name) = req.name.filter(|n| !n.is_empty()) else {
        return Err(ApiError::Validation("name is required".into()));
    };

    let id = state.db.create_planet(&name, req.description.as_deref())?;

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            id,
            name,
            description: req.description,
        }),
    ))
}

pub async fn update_planet(
    State(state): State<Arc<AppStateInner>>,
    Path(planet_id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = state
        .db
        .get_planet(planet_id)?
        .ok_or_else(|| ApiError::NotFound("planet not found".into()))?;

    let name = req.name.unwrap_or(current.name);
    let description = req.description.or(current.description);

    state
        .db
        .update_planet(planet_id, &name, description.as_deref())?;

    Ok(Json(EntryResponse {
        id: planet_id,
        name,
        description,
    }))
}

pub async fn delete_planet(
    State(state): State<Arc<AppStateInner>>,
    Path(planet_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_planet(planet_id)?
        .ok_or_else(|| ApiError::NotFound("planet not found".into()))?;

    state.db.delete_planet(planet_id)?;

    Ok(Json(serde_json::json!({ "msg": "planet deleted" })))
}
