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

pub async fn list_characters(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, ApiError> {
    let characters: Vec<EntryResponse> = state
        .db
        .list_characters()?
        .into_iter()
        .map(to_response)
        .collect();

    Ok(Json(characters))
}

pub async fn get_character(
    State(state): State<Arc<AppStateInner>>,
    Path(character_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_character(character_id)?
        .ok_or_else(|| ApiError::NotFound("character not found".into()))?;

    Ok(Json(to_response(row)))
}

pub async fn create_character(
    State(state): State<Arc<AppStateInner>>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(name) = req.name.filter(|n| !n.is_empty()) else {
        return Err(ApiError::Validation("name is required".into()));
    };

    let id = state.db.create_character(&name, req.description.as_deref())?;

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            id,
            name,
            description: req.description,
        }),
    ))
}

pub async fn update_character(
    State(state): State<Arc<AppStateInner>>,
    Path(character_id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = state
        .db
        .get_character(character_id)?
        .ok_or_else(|| ApiError::NotFound("character not found".into()))?;

    let name = req.name.unwrap_or(current.name);
    let description = req.description.or(current.description);

    state
        .db
        .update_character(character_id, &name, description.as_deref())?;

    Ok(Json(EntryResponse {
        id: character_id,
        name,
        description,
    }))
}

pub async fn delete_character(
    State(state): State<Arc<AppStateInner>>,
    Path(character_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_character(character_id)?
        .ok_or_else(|| ApiError::NotFound("character not found".into()))?;

    state.db.delete_character(character_id)?;

    Ok(Json(serde_json::json!({ "msg": "character deleted" })))
}
