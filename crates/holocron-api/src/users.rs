use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use holocron_types::api::{CreateUserRequest, FavoriteResponse, UpdateUserRequest, UserResponse};

use crate::AppStateInner;
use crate::error::ApiError;
use crate::favorites;
use crate::password;

pub async fn list_users(
    State(state): State<Arc<AppStateInner>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.db.list_users()?;
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();

    // One batched query for every user's favorites, grouped in memory.
    let mut by_user: HashMap<i64, Vec<FavoriteResponse>> = HashMap::new();
    for row in state.db.favorites_for_users(&ids)? {
        by_user
            .entry(row.user_id)
            .or_default()
            .push(favorites::to_response(row));
    }

    let body: Vec<UserResponse> = users
        .into_iter()
        .map(|user| UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            favorites: by_user.remove(&user.id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(body))
}

pub async fn get_user(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let favorites = state
        .db
        .favorites_for_user(user_id)?
        .into_iter()
        .map(favorites::to_response)
        .collect();

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        favorites,
    }))
}

pub async fn create_user(
    State(state): State<Arc<AppStateInner>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(username), Some(pw)) = (req.email, req.username, req.password) else {
        return Err(ApiError::Validation(
            "email, username, and password are required".into(),
        ));
    };
    if email.is_empty() || username.is_empty() || pw.is_empty() {
        return Err(ApiError::Validation(
            "email, username, and password are required".into(),
        ));
    }

    if state.db.find_user_conflict(&username, &email, None)?.is_some() {
        return Err(ApiError::Validation(
            "email or username already exists".into(),
        ));
    }

    let password_hash = password::hash(&pw)?;
    let id = state.db.create_user(&username, &email, &password_hash)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id,
            username,
            email,
            favorites: vec![],
        }),
    ))
}

pub async fn update_user(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let current = state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    // Absent fields keep their stored values.
    let username = req.username.unwrap_or(current.username);
    let email = req.email.unwrap_or(current.email);

    if state
        .db
        .find_user_conflict(&username, &email, Some(user_id))?
        .is_some()
    {
        return Err(ApiError::Validation(
            "email or username already exists".into(),
        ));
    }

    let password_hash = match req.password.as_deref() {
        Some(pw) if !pw.is_empty() => Some(password::hash(pw)?),
        _ => None,
    };

    state
        .db
        .update_user(user_id, &username, &email, password_hash.as_deref())?;

    let favorites = state
        .db
        .favorites_for_user(user_id)?
        .into_iter()
        .map(favorites::to_response)
        .collect();

    Ok(Json(UserResponse {
        id: user_id,
        username,
        email,
        favorites,
    }))
}

pub async fn delete_user(
    State(state): State<Arc<AppStateInner>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .db
        .get_user(user_id)?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    // Favorites go with the user via ON DELETE CASCADE.
    state.db.delete_user(user_id)?;

    Ok(Json(serde_json::json!({ "msg": "user deleted" })))
}
