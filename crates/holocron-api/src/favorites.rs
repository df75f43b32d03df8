use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use holocron_db::models::FavoriteRow;
use holocron_types::api::{CreateFavoriteRequest, FavoriteItem, FavoriteResponse};
use holocron_types::models::FavoriteTarget;

use crate::AppStateInner;
use crate::error::ApiError;

/// Resolve a joined favorite row into the tagged `{id, name, type}` item
/// shape. A row satisfying neither side falls back to the all-null item.
pub(crate) fn to_response(row: FavoriteRow) -> FavoriteResponse {
    let item = match FavoriteTarget::from_ids(row.character_id, row.planet_id) {
        Ok(target @ FavoriteTarget::Character(id)) => FavoriteItem {
            id: Some(id),
            name: row.character_name,
            kind: Some(target.kind().to_string()),
        },
        Ok(target @ FavoriteTarget::Planet(id)) => FavoriteItem {
            id: Some(id),
            name: row.planet_name,
            kind: Some(target.kind().to_string()),
        },
        Err(_) => FavoriteItem::unresolved(),
    };

    FavoriteResponse {
        id: row.id,
        user_id: row.user_id,
        item,
    }
}

pub async fn list_favorites(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let favorites: Vec<FavoriteResponse> = state
        .db
        .favorites_for_user(user_id)?
        .into_iter()
        .map(to_response)
        .collect();

    Ok(Json(favorites))
}

pub async fn create_favorite(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<i64>,
    Json(req): Json<CreateFavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target = FavoriteTarget::from_ids(req.character_id, req.planet_id)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    match target {
        FavoriteTarget::Character(id) => {
            state
                .db
                .get_character(id)?
                .ok_or_else(|| ApiError::NotFound("character not found".into()))?;
        }
        FavoriteTarget::Planet(id) => {
            state
                .db
                .get_planet(id)?
                .ok_or_else(|| ApiError::NotFound("planet not found".into()))?;
        }
    }

    let favorite_id = state.db.create_favorite(user_id, &target)?;
    let row = state
        .db
        .get_favorite(favorite_id)?
        .ok_or_else(|| ApiError::Internal(anyhow!("favorite {} missing after insert", favorite_id)))?;

    Ok((StatusCode::CREATED, Json(to_response(row))))
}

pub async fn delete_favorite(
    State(state): State<Arc<AppStateInner>>,
    Path((user_id, favorite_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    if !state.db.delete_favorite(user_id, favorite_id)? {
        return Err(ApiError::NotFound("favorite not found".into()));
    }

    Ok(Json(serde_json::json!({ "msg": "favorite removed" })))
}
