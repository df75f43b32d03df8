pub mod characters;
pub mod error;
pub mod favorites;
pub mod password;
pub mod planets;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
};

use holocron_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// All catalogue routes. Layers (CORS, tracing) are applied by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/{user_id}/favorites",
            get(favorites::list_favorites).post(favorites::create_favorite),
        )
        .route(
            "/users/{user_id}/favorites/{favorite_id}",
            delete(favorites::delete_favorite),
        )
        .route(
            "/people",
            get(characters::list_characters).post(characters::create_character),
        )
        .route(
            "/people/{character_id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route(
            "/planets",
            get(planets::list_planets).post(planets::create_planet),
        )
        .route(
            "/planets/{planet_id}",
            get(planets::get_planet)
                .put(planets::update_planet)
                .delete(planets::delete_planet),
        )
        .with_state(state)
}
