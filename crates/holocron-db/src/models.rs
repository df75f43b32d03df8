#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Favorite row with both sides of the polymorphic target pre-joined, so
/// serialization never issues follow-up lookups.
#[derive(Debug, Clone)]
pub struct FavoriteRow {
    pub id: i64,
    pub user_id: i64,
    pub character_id: Option<i64>,
    pub character_name: Option<String>,
    pub planet_id: Option<i64>,
    pub planet_name: Option<String>,
}
