use serde::{Deserialize, Serialize};

// -- Users --
//
// Create/update fields are all optional so handlers can answer missing
// required fields with a 400 message instead of a deserialization rejection,
// and so updates can be partial.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Canonical user projection. The password hash never leaves the database
/// layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub favorites: Vec<FavoriteResponse>,
}

// -- Characters & planets --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEntryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEntryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

// -- Favorites --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFavoriteRequest {
    pub character_id: Option<i64>,
    pub planet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub id: i64,
    pub user_id: i64,
    pub item: FavoriteItem,
}

/// Resolved favorite target: `{id, name, type}`. All fields fall back to
/// null when the row resolves to neither side, which the construction
/// invariant rules out in practice.
#[derive(Debug, Serialize)]
pub struct FavoriteItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl FavoriteItem {
    pub fn unresolved() -> Self {
        Self {
            id: None,
            name: None,
            kind: None,
        }
    }
}
